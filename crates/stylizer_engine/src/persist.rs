use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stylizer_logging::stylizer_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Name the downloaded result is saved under unless told otherwise.
pub const DEFAULT_ARTIFACT_NAME: &str = "stylized_image.jpg";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {dir} as output directory: {reason}")]
    OutputDir { dir: PathBuf, reason: String },
    #[error("nothing to save: no artifact has been downloaded")]
    NothingToSave,
    #[error("invalid artifact name {0:?}")]
    InvalidName(String),
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Saves downloaded results into one output directory.
///
/// A save either leaves the complete artifact at [`ArtifactStore::target`]
/// or leaves any previous file there untouched.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    file_name: String,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: DEFAULT_ARTIFACT_NAME.to_string(),
        }
    }

    /// Saves under `file_name` instead of [`DEFAULT_ARTIFACT_NAME`]. The name
    /// must be a plain file name, not a path.
    pub fn with_file_name(mut self, file_name: &str) -> Result<Self, PersistError> {
        let plain = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !plain {
            return Err(PersistError::InvalidName(file_name.to_string()));
        }
        self.file_name = file_name.to_string();
        Ok(self)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn target(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Writes the artifact, replacing an earlier save. `None` or an empty
    /// artifact is refused before the directory is touched.
    pub fn save(&self, artifact: Option<&[u8]>) -> Result<PathBuf, PersistError> {
        let bytes = match artifact {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Err(PersistError::NothingToSave),
        };
        self.prepare_dir()?;

        let target = self.target();
        let io_err = |source: io::Error| PersistError::Io {
            path: target.clone(),
            source,
        };
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        staged.write_all(bytes).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged
            .persist(&target)
            .map_err(|err| io_err(err.error))?;

        stylizer_debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }

    fn prepare_dir(&self) -> Result<(), PersistError> {
        let unusable = |reason: String| PersistError::OutputDir {
            dir: self.dir.clone(),
            reason,
        };
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(unusable("not a directory".to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir).map_err(|err| unusable(err.to_string()))
            }
            Err(err) => Err(unusable(err.to_string())),
        }
    }
}
