use stylizer_core::{Asset, JobHandle, JobId, JobStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Submitted {
        job_id: JobId,
        result: Result<JobHandle, SubmissionError>,
    },
    StatusChecked {
        job_id: JobId,
        attempt: u32,
        result: Result<JobStatus, PollError>,
    },
    PollingExhausted {
        job_id: JobId,
        attempts: u32,
    },
    PresetFetched {
        url: String,
        result: Result<Asset, FetchError>,
    },
    ResultFetched {
        job_id: JobId,
        result: Result<Vec<u8>, FetchError>,
    },
}

impl EngineEvent {
    /// Job generation the event belongs to; presets are not tied to a job.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            EngineEvent::Submitted { job_id, .. }
            | EngineEvent::StatusChecked { job_id, .. }
            | EngineEvent::PollingExhausted { job_id, .. }
            | EngineEvent::ResultFetched { job_id, .. } => Some(*job_id),
            EngineEvent::PresetFetched { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("could not reach the service: {0}")]
    Connectivity(String),
    #[error("service rejected the submission with http status {0}")]
    Rejected(u16),
    #[error("malformed submission response: {0}")]
    MalformedResponse(String),
    #[error("request could not be encoded: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("could not reach the service: {0}")]
    Connectivity(String),
    #[error("status check answered with http status {0}")]
    HttpStatus(u16),
    #[error("malformed status response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("timeout")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid service base url {url}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("http client could not be built: {0}")]
    Client(String),
}
