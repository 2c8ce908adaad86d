use crate::state::{
    MSG_DONE, MSG_MISSING_ASSETS, MSG_PROCESSING, MSG_SERVER_FAILED, MSG_STATUS_FAILED,
    MSG_SUBMIT_FAILED, MSG_UPLOADING,
};
use crate::{
    AppState, AssetRole, Effect, FailureReason, JobId, JobStatus, Msg, Phase, StylizationRequest,
    ValidationError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ContentSelected(asset) => {
            state.set_content(asset);
            Vec::new()
        }
        Msg::StyleUploaded(asset) => {
            state.set_uploaded_style(asset);
            Vec::new()
        }
        Msg::PresetSelected { url } => {
            let url = url.trim().to_string();
            if url.is_empty() {
                return (state, Vec::new());
            }
            state.request_preset(url.clone());
            vec![Effect::FetchPreset { url }]
        }
        Msg::PresetLoaded { url, asset } => {
            // Only the most recently requested preset may land.
            if state.pending_preset() != Some(url.as_str()) {
                return (state, Vec::new());
            }
            if asset.is_empty() {
                state.reject_preset();
            } else {
                state.install_preset(url, asset);
            }
            Vec::new()
        }
        Msg::PresetFailed { url, .. } => {
            if state.pending_preset() == Some(url.as_str()) {
                state.reject_preset();
            }
            Vec::new()
        }
        Msg::IntensityChanged(intensity) => {
            if !state.phase().is_busy() {
                state.set_intensity(intensity);
            }
            Vec::new()
        }
        Msg::ResolutionChanged(resolution) => {
            if !state.phase().is_busy() {
                state.set_resolution(resolution);
            }
            Vec::new()
        }
        Msg::StylizeClicked => start_job(&mut state),
        Msg::SubmissionAccepted { job_id, handle } => {
            if !is_submitting(&state, job_id) {
                return (state, Vec::new());
            }
            let next = Phase::Polling(handle.clone());
            let from = state.enter(next.clone());
            state.set_status(MSG_PROCESSING);
            vec![
                Effect::Transition { from, to: next },
                Effect::StartPolling { job_id, handle },
            ]
        }
        Msg::SubmissionFailed { job_id, .. } => {
            if !is_submitting(&state, job_id) {
                return (state, Vec::new());
            }
            fail(&mut state, FailureReason::Submission, MSG_SUBMIT_FAILED)
        }
        Msg::StatusObserved { job_id, status } => {
            if !is_polling(&state, job_id) {
                return (state, Vec::new());
            }
            match status {
                JobStatus::Pending => Vec::new(),
                JobStatus::Complete(locator) => {
                    let next = Phase::Succeeded(locator);
                    let from = state.enter(next.clone());
                    state.set_status(MSG_DONE);
                    vec![Effect::CancelJob, Effect::Transition { from, to: next }]
                }
                JobStatus::Failed => {
                    fail(&mut state, FailureReason::ServerReported, MSG_SERVER_FAILED)
                }
            }
        }
        Msg::StatusCheckFailed { job_id, .. } => {
            if !is_polling(&state, job_id) {
                return (state, Vec::new());
            }
            fail(&mut state, FailureReason::StatusCheck, MSG_STATUS_FAILED)
        }
        Msg::PollingExhausted { job_id, attempts } => {
            if !is_polling(&state, job_id) {
                return (state, Vec::new());
            }
            let message = format!("Gave up waiting for the server after {attempts} status checks.");
            fail(&mut state, FailureReason::PollingGaveUp, message)
        }
        Msg::DownloadClicked => match state.phase().clone() {
            Phase::Succeeded(locator) if !state.is_fetching_result() => {
                state.start_result_fetch();
                vec![Effect::FetchResult {
                    job_id: state.current_job(),
                    locator,
                }]
            }
            _ => Vec::new(),
        },
        Msg::ResultFetched { job_id, bytes } => {
            if job_id == state.current_job() && state.is_fetching_result() {
                state.store_artifact(bytes);
            }
            Vec::new()
        }
        Msg::ResultFetchFailed { job_id, .. } => {
            if job_id == state.current_job() && state.is_fetching_result() {
                state.fail_result_fetch();
            }
            Vec::new()
        }
        Msg::Reset => {
            let effects = return_to_idle(&mut state);
            // Retire the generation so late answers for it are dropped.
            state.begin_job();
            state.abandon_preset();
            state.set_status("");
            effects
        }
    };

    (state, effects)
}

fn start_job(state: &mut AppState) -> Vec<Effect> {
    let request = match StylizationRequest::build(
        state.content(),
        state.style(),
        state.resolution(),
        state.intensity(),
    ) {
        Ok(request) => request,
        Err(ValidationError::EmptyAsset(role)) => {
            state.set_status(empty_asset_message(role));
            return Vec::new();
        }
        Err(_) => {
            state.set_status(MSG_MISSING_ASSETS);
            return Vec::new();
        }
    };

    // A new submission supersedes whatever was running: cancel, go idle, then submit.
    let mut effects = return_to_idle(state);
    let job_id = state.begin_job();
    let from = state.enter(Phase::Submitting);
    state.set_status(MSG_UPLOADING);
    effects.push(Effect::Transition {
        from,
        to: Phase::Submitting,
    });
    effects.push(Effect::Submit { job_id, request });
    effects
}

/// Status line naming which selected image has no bytes.
pub fn empty_asset_message(role: AssetRole) -> String {
    format!("The selected {role} image is empty. Please choose another file.")
}

fn return_to_idle(state: &mut AppState) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if state.phase().is_busy() {
        effects.push(Effect::CancelJob);
    }
    if *state.phase() != Phase::Idle {
        let from = state.enter(Phase::Idle);
        effects.push(Effect::Transition {
            from,
            to: Phase::Idle,
        });
    }
    effects
}

fn fail(state: &mut AppState, reason: FailureReason, message: impl Into<String>) -> Vec<Effect> {
    let next = Phase::Failed(reason);
    let from = state.enter(next.clone());
    state.set_status(message);
    vec![Effect::CancelJob, Effect::Transition { from, to: next }]
}

fn is_submitting(state: &AppState, job_id: JobId) -> bool {
    job_id == state.current_job() && *state.phase() == Phase::Submitting
}

fn is_polling(state: &AppState, job_id: JobId) -> bool {
    job_id == state.current_job() && matches!(state.phase(), Phase::Polling(_))
}
