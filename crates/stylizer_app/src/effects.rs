use stylizer_core::{Effect, JobId, Msg};
use stylizer_engine::{EngineEvent, EngineHandle};
use stylizer_logging::{stylizer_debug, stylizer_info};

/// Turns state-machine effects into engine calls.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&mut self, effect: Effect) {
        match effect {
            Effect::CancelJob => self.engine.cancel_job(),
            Effect::Submit { job_id, request } => {
                stylizer_info!(
                    "Submit job_id={} content={} style={} resolution={} style_weight={}",
                    job_id,
                    request.content().file_name,
                    request.style().file_name,
                    request.resolution().pixels(),
                    request.style_weight()
                );
                self.engine.submit(job_id, request);
            }
            Effect::StartPolling { job_id, handle } => {
                self.engine.start_polling(job_id, handle);
            }
            Effect::FetchPreset { url } => {
                stylizer_info!("FetchPreset url={}", url);
                self.engine.fetch_preset(url);
            }
            Effect::FetchResult { job_id, locator } => {
                self.engine.fetch_result(job_id, locator);
            }
            Effect::Transition { from, to } => {
                // Observers are notified by the controller.
                stylizer_debug!("Unrouted transition {} -> {}", from, to);
            }
        }
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.engine.active_job()
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

/// Translates an engine event into the message the state machine understands.
pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { job_id, result } => match result {
            Ok(handle) => Msg::SubmissionAccepted { job_id, handle },
            Err(err) => Msg::SubmissionFailed {
                job_id,
                error: err.to_string(),
            },
        },
        EngineEvent::StatusChecked { job_id, result, .. } => match result {
            Ok(status) => Msg::StatusObserved { job_id, status },
            Err(err) => Msg::StatusCheckFailed {
                job_id,
                error: err.to_string(),
            },
        },
        EngineEvent::PollingExhausted { job_id, attempts } => {
            Msg::PollingExhausted { job_id, attempts }
        }
        EngineEvent::PresetFetched { url, result } => match result {
            Ok(asset) => Msg::PresetLoaded { url, asset },
            Err(err) => Msg::PresetFailed {
                url,
                error: err.to_string(),
            },
        },
        EngineEvent::ResultFetched { job_id, result } => match result {
            Ok(bytes) => Msg::ResultFetched { job_id, bytes },
            Err(err) => Msg::ResultFetchFailed {
                job_id,
                error: err.to_string(),
            },
        },
    }
}
