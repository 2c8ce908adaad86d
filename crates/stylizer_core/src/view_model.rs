use crate::{Intensity, JobId, Phase, Resolution};

/// Everything a presentation layer needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub status_message: String,
    /// Spinner on; inputs locked.
    pub is_loading: bool,
    pub can_submit: bool,
    pub has_content: bool,
    pub has_style: bool,
    pub selected_preset: Option<String>,
    pub intensity: Intensity,
    pub style_weight: u32,
    pub resolution: Resolution,
    pub job_id: JobId,
    pub has_artifact: bool,
    pub dirty: bool,
}
