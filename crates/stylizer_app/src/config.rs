use std::path::PathBuf;

use stylizer_engine::{PollSettings, ServiceSettings, SetupError};

/// The one environment knob: where the stylization service lives.
pub const API_URL_VAR: &str = "STYLIZER_API_URL";

#[derive(Debug, Clone)]
pub struct StylizerConfig {
    pub service: ServiceSettings,
    pub poll: PollSettings,
    /// Where saved artifacts land.
    pub output_dir: PathBuf,
}

impl Default for StylizerConfig {
    fn default() -> Self {
        let output_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("output");
        Self {
            service: ServiceSettings::default(),
            poll: PollSettings::default(),
            output_dir,
        }
    }
}

impl StylizerConfig {
    pub fn from_env() -> Result<Self, SetupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SetupError> {
        let service = match lookup(API_URL_VAR).filter(|value| !value.trim().is_empty()) {
            Some(url) => ServiceSettings::with_base_url(&url)?,
            None => ServiceSettings::default(),
        };
        Ok(Self {
            service,
            ..Self::default()
        })
    }
}
