use crate::view_model::AppViewModel;
use crate::{Asset, Intensity, JobId, Phase, Resolution};

pub const MSG_UPLOADING: &str = "2/4: Uploading images...";
pub const MSG_PROCESSING: &str = "3/4: Processing on server... This may take a minute.";
pub const MSG_DONE: &str = "4/4: Done!";
pub const MSG_SERVER_FAILED: &str = "Task failed on the server. Please try again.";
pub const MSG_SUBMIT_FAILED: &str = "Error: Could not start the process. Check API connection.";
pub const MSG_STATUS_FAILED: &str = "Error checking status. Stopping updates.";
pub const MSG_MISSING_ASSETS: &str = "Please upload or select both a Content and a Style image.";
pub const MSG_PRESET_LOADING: &str = "Downloading preset style...";
pub const MSG_PRESET_FAILED: &str = "Error: Could not download preset style.";
pub const MSG_RESULT_LOADING: &str = "Downloading result...";
pub const MSG_RESULT_READY: &str = "Result downloaded and ready to save.";
pub const MSG_RESULT_FAILED: &str = "Error: Failed to download the image.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    content: Option<Asset>,
    style: Option<Asset>,
    selected_preset: Option<String>,
    pending_preset: Option<String>,
    intensity: Intensity,
    resolution: Resolution,
    phase: Phase,
    job_id: JobId,
    fetching_result: bool,
    artifact: Option<Vec<u8>>,
    status_message: String,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase.clone(),
            status_message: self.status_message.clone(),
            is_loading: self.phase.is_busy(),
            can_submit: self.content.is_some() && self.style.is_some(),
            has_content: self.content.is_some(),
            has_style: self.style.is_some(),
            selected_preset: self.selected_preset.clone(),
            intensity: self.intensity,
            style_weight: self.intensity.style_weight(),
            resolution: self.resolution,
            job_id: self.job_id,
            has_artifact: self.artifact.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn current_job(&self) -> JobId {
        self.job_id
    }

    pub fn artifact(&self) -> Option<&[u8]> {
        self.artifact.as_deref()
    }

    /// True while any engine task owes this state an answer.
    pub fn awaiting_engine(&self) -> bool {
        self.phase.is_busy() || self.fetching_result || self.pending_preset.is_some()
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn content(&self) -> Option<&Asset> {
        self.content.as_ref()
    }

    pub(crate) fn style(&self) -> Option<&Asset> {
        self.style.as_ref()
    }

    pub(crate) fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub(crate) fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub(crate) fn pending_preset(&self) -> Option<&str> {
        self.pending_preset.as_deref()
    }

    pub(crate) fn is_fetching_result(&self) -> bool {
        self.fetching_result
    }

    pub(crate) fn set_content(&mut self, asset: Asset) {
        self.content = Some(asset);
        self.dirty = true;
    }

    pub(crate) fn set_uploaded_style(&mut self, asset: Asset) {
        self.style = Some(asset);
        self.selected_preset = None;
        self.pending_preset = None;
        self.dirty = true;
    }

    pub(crate) fn request_preset(&mut self, url: String) {
        self.pending_preset = Some(url);
        self.set_status(MSG_PRESET_LOADING);
    }

    pub(crate) fn install_preset(&mut self, url: String, asset: Asset) {
        self.style = Some(asset);
        self.selected_preset = Some(url);
        self.pending_preset = None;
        self.set_status("");
    }

    pub(crate) fn reject_preset(&mut self) {
        self.pending_preset = None;
        self.set_status(MSG_PRESET_FAILED);
    }

    pub(crate) fn abandon_preset(&mut self) {
        self.pending_preset = None;
    }

    pub(crate) fn set_intensity(&mut self, intensity: Intensity) {
        if self.intensity != intensity {
            self.intensity = intensity;
            self.dirty = true;
        }
    }

    pub(crate) fn set_resolution(&mut self, resolution: Resolution) {
        if self.resolution != resolution {
            self.resolution = resolution;
            self.dirty = true;
        }
    }

    /// Moves to `next` and returns the phase that was left.
    pub(crate) fn enter(&mut self, next: Phase) -> Phase {
        self.dirty = true;
        std::mem::replace(&mut self.phase, next)
    }

    /// Starts a new job generation, dropping everything tied to the previous one.
    pub(crate) fn begin_job(&mut self) -> JobId {
        self.job_id += 1;
        self.artifact = None;
        self.fetching_result = false;
        self.dirty = true;
        self.job_id
    }

    pub(crate) fn start_result_fetch(&mut self) {
        self.fetching_result = true;
        self.set_status(MSG_RESULT_LOADING);
    }

    pub(crate) fn store_artifact(&mut self, bytes: Vec<u8>) {
        self.fetching_result = false;
        self.artifact = Some(bytes);
        self.set_status(MSG_RESULT_READY);
    }

    pub(crate) fn fail_result_fetch(&mut self) {
        self.fetching_result = false;
        self.set_status(MSG_RESULT_FAILED);
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.dirty = true;
    }
}
