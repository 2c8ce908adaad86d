use crate::{JobHandle, JobId, Phase, ResultLocator, StylizationRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Cancel whatever task currently occupies the job slot.
    CancelJob,
    Submit {
        job_id: JobId,
        request: StylizationRequest,
    },
    StartPolling {
        job_id: JobId,
        handle: JobHandle,
    },
    FetchPreset {
        url: String,
    },
    FetchResult {
        job_id: JobId,
        locator: ResultLocator,
    },
    /// Tell observers the lifecycle moved.
    Transition {
        from: Phase,
        to: Phase,
    },
}
