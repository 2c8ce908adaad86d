//! Stylizer engine: service client, poll loop and effect execution.
mod engine;
mod filename;
mod persist;
mod poller;
mod service;
mod types;

pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use filename::asset_file_name;
pub use persist::{ArtifactStore, PersistError, DEFAULT_ARTIFACT_NAME};
pub use poller::{poll_until_terminal, PollSettings, DEFAULT_POLL_INTERVAL};
pub use service::{ReqwestStyleService, ServiceSettings, StyleService, DEFAULT_BASE_URL};
pub use types::{EngineEvent, FetchError, PollError, SetupError, SubmissionError};
