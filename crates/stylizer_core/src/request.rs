use std::fmt;

use thiserror::Error;

use crate::Intensity;

/// Locally detected problems; these never reach the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a content image is required")]
    MissingContent,
    #[error("a style image is required")]
    MissingStyle,
    #[error("the {0} image is empty")]
    EmptyAsset(AssetRole),
    #[error("intensity {0} is outside 1..=100")]
    IntensityOutOfRange(i64),
    #[error("resolution {0} is not one of 128, 256, 512, 1024")]
    UnsupportedResolution(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    Content,
    Style,
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRole::Content => write!(f, "content"),
            AssetRole::Style => write!(f, "style"),
        }
    }
}

/// An image blob with the media type it was declared with.
#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Image payloads are large; keep Debug output to the metadata.
impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    Px128,
    Px256,
    #[default]
    Px512,
    Px1024,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [
        Resolution::Px128,
        Resolution::Px256,
        Resolution::Px512,
        Resolution::Px1024,
    ];

    pub fn pixels(self) -> u32 {
        match self {
            Resolution::Px128 => 128,
            Resolution::Px256 => 256,
            Resolution::Px512 => 512,
            Resolution::Px1024 => 1024,
        }
    }
}

impl TryFrom<u32> for Resolution {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.pixels() == value)
            .ok_or(ValidationError::UnsupportedResolution(value))
    }
}

/// Everything the service needs to start one stylization job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylizationRequest {
    content: Asset,
    style: Asset,
    resolution: Resolution,
    style_weight: u32,
}

impl StylizationRequest {
    /// Builds a request, refusing missing or empty assets.
    pub fn build(
        content: Option<&Asset>,
        style: Option<&Asset>,
        resolution: Resolution,
        intensity: Intensity,
    ) -> Result<Self, ValidationError> {
        let content = content.ok_or(ValidationError::MissingContent)?;
        let style = style.ok_or(ValidationError::MissingStyle)?;
        if content.is_empty() {
            return Err(ValidationError::EmptyAsset(AssetRole::Content));
        }
        if style.is_empty() {
            return Err(ValidationError::EmptyAsset(AssetRole::Style));
        }
        Ok(Self {
            content: content.clone(),
            style: style.clone(),
            resolution,
            style_weight: intensity.style_weight(),
        })
    }

    pub fn content(&self) -> &Asset {
        &self.content
    }

    pub fn style(&self) -> &Asset {
        &self.style
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn style_weight(&self) -> u32 {
        self.style_weight
    }

    /// Splits the request into owned parts for the transport layer.
    pub fn into_parts(self) -> (Asset, Asset, Resolution, u32) {
        (self.content, self.style, self.resolution, self.style_weight)
    }
}
