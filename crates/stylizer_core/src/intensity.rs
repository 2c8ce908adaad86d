use crate::ValidationError;

const MIN_INTENSITY: u8 = 1;
const MAX_INTENSITY: u8 = 100;
const MIN_STYLE_WEIGHT: f64 = 1e4;
const MAX_STYLE_WEIGHT: f64 = 1e7;

/// User-facing style strength on a linear 1..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: Intensity = Intensity(MIN_INTENSITY);
    pub const MAX: Intensity = Intensity(MAX_INTENSITY);

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (MIN_INTENSITY..=MAX_INTENSITY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::IntensityOutOfRange(i64::from(value)))
        }
    }

    /// Pins arbitrary slider input into range instead of rejecting it.
    pub fn clamped(value: i64) -> Self {
        let pinned = value.clamp(i64::from(MIN_INTENSITY), i64::from(MAX_INTENSITY));
        // The clamp above keeps the value inside u8.
        Self(pinned as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn style_weight(self) -> u32 {
        map_intensity(self)
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<i64> for Intensity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(|v| Intensity::new(v).ok())
            .ok_or(ValidationError::IntensityOutOfRange(value))
    }
}

/// Maps intensity onto the service's style weight with a log sweep from
/// 1e4 (intensity 1) to 1e7 (intensity 100).
pub fn map_intensity(intensity: Intensity) -> u32 {
    let min_log = MIN_STYLE_WEIGHT.ln();
    let max_log = MAX_STYLE_WEIGHT.ln();
    let scale = (max_log - min_log) / f64::from(MAX_INTENSITY - MIN_INTENSITY);
    let steps = f64::from(intensity.get() - MIN_INTENSITY);
    (min_log + scale * steps).exp().round() as u32
}
