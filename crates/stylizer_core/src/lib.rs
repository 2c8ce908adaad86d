//! Stylizer core: pure job lifecycle state machine and view-model helpers.
mod effect;
mod intensity;
mod job;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use intensity::{map_intensity, Intensity};
pub use job::{FailureReason, JobHandle, JobId, JobStatus, Phase, ResultLocator};
pub use msg::Msg;
pub use request::{Asset, AssetRole, Resolution, StylizationRequest, ValidationError};
pub use state::{
    AppState, MSG_DONE, MSG_MISSING_ASSETS, MSG_PRESET_FAILED, MSG_PRESET_LOADING,
    MSG_PROCESSING, MSG_RESULT_FAILED, MSG_RESULT_READY, MSG_SERVER_FAILED, MSG_STATUS_FAILED,
    MSG_SUBMIT_FAILED, MSG_UPLOADING,
};
pub use update::{empty_asset_message, update};
pub use view_model::AppViewModel;
