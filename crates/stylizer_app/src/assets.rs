use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stylizer_core::Asset;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{0}: only .png, .jpg and .jpeg images are accepted")]
    UnsupportedType(PathBuf),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} is empty")]
    Empty(PathBuf),
}

/// Media type an upload is declared with, chosen by extension.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Reads a local image into an upload-ready asset.
pub fn load_asset(path: &Path) -> Result<Asset, AssetError> {
    let media_type =
        media_type_for(path).ok_or_else(|| AssetError::UnsupportedType(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(Asset::new(file_name, media_type, bytes))
}
