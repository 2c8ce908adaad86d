use std::fmt;

/// Local generation number for a submission. Bumped on every submit so that
/// events from superseded jobs can be told apart.
pub type JobId = u64;

/// Opaque identifier handed out by the service for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    /// Returns `None` for a blank id; the service never issues one.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the finished artifact lives, relative to the service base or absolute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultLocator(String);

impl ResultLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Complete(ResultLocator),
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Submission,
    ServerReported,
    StatusCheck,
    PollingGaveUp,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Submission => write!(f, "submission error"),
            FailureReason::ServerReported => write!(f, "server reported failure"),
            FailureReason::StatusCheck => write!(f, "status check error"),
            FailureReason::PollingGaveUp => write!(f, "polling gave up"),
        }
    }
}

/// Lifecycle of the current job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling(JobHandle),
    Succeeded(ResultLocator),
    Failed(FailureReason),
}

impl Phase {
    /// Submitting or polling: a task is in flight for the current job.
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Submitting | Phase::Polling(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded(_) | Phase::Failed(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Submitting => write!(f, "Submitting"),
            Phase::Polling(handle) => write!(f, "Polling({handle})"),
            Phase::Succeeded(locator) => write!(f, "Succeeded({locator})"),
            Phase::Failed(reason) => write!(f, "Failed({reason})"),
        }
    }
}
