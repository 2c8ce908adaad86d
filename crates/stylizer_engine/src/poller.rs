use std::sync::Arc;
use std::time::Duration;

use stylizer_core::{JobHandle, JobId, JobStatus};
use stylizer_logging::{stylizer_debug, stylizer_warn};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, StyleService};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Fixed gap between status checks; no backoff, no jitter.
    pub interval: Duration,
    /// Give up after this many checks that all came back pending.
    /// `None` polls until a terminal status or cancellation.
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Checks `handle` every `settings.interval` until the job is terminal, a
/// check errors, the attempt ceiling is hit, or `cancel` fires.
///
/// Each check is awaited before the next sleep starts, so at most one request
/// per job is in flight. Nothing is emitted once `cancel` has fired.
pub async fn poll_until_terminal(
    service: Arc<dyn StyleService>,
    job_id: JobId,
    handle: JobHandle,
    settings: PollSettings,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut attempts: u32 = 0;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(settings.interval) => {}
        }

        attempts += 1;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = service.check_status(&handle) => result,
        };
        if cancel.is_cancelled() {
            break;
        }

        let keep_polling = matches!(result, Ok(JobStatus::Pending));
        if let Err(err) = &result {
            stylizer_warn!("Status check {} for job {} failed: {}", attempts, job_id, err);
        }
        sink.emit(EngineEvent::StatusChecked {
            job_id,
            attempt: attempts,
            result,
        });
        if !keep_polling {
            stylizer_debug!("Poll loop for job {} reached a terminal answer", job_id);
            return;
        }

        if settings.max_attempts.is_some_and(|max| attempts >= max) {
            stylizer_warn!(
                "Job {} still pending after {} checks; giving up",
                job_id,
                attempts
            );
            sink.emit(EngineEvent::PollingExhausted { job_id, attempts });
            return;
        }
    }
    stylizer_debug!("Poll loop for job {} cancelled after {} checks", job_id, attempts);
}
