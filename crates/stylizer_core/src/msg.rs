use crate::{Asset, Intensity, JobHandle, JobId, JobStatus, Resolution};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a content image.
    ContentSelected(Asset),
    /// User uploaded their own style image.
    StyleUploaded(Asset),
    /// User picked a preset style by URL.
    PresetSelected { url: String },
    /// Engine finished downloading a preset style.
    PresetLoaded { url: String, asset: Asset },
    /// Engine failed to download a preset style.
    PresetFailed { url: String, error: String },
    /// User moved the intensity slider.
    IntensityChanged(Intensity),
    /// User picked an output resolution.
    ResolutionChanged(Resolution),
    /// User asked to start a stylization job.
    StylizeClicked,
    /// Engine: the service accepted the submission.
    SubmissionAccepted { job_id: JobId, handle: JobHandle },
    /// Engine: the submission exchange failed.
    SubmissionFailed { job_id: JobId, error: String },
    /// Engine: one status check answered.
    StatusObserved { job_id: JobId, status: JobStatus },
    /// Engine: one status check errored.
    StatusCheckFailed { job_id: JobId, error: String },
    /// Engine: the configured attempt ceiling was reached while still pending.
    PollingExhausted { job_id: JobId, attempts: u32 },
    /// User asked to download the finished artifact.
    DownloadClicked,
    /// Engine: artifact bytes arrived.
    ResultFetched { job_id: JobId, bytes: Vec<u8> },
    /// Engine: artifact download failed.
    ResultFetchFailed { job_id: JobId, error: String },
    /// Drop the current job and return to idle (also used on teardown).
    Reset,
}
