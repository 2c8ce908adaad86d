use std::sync::Arc;

use stylizer_core::{JobHandle, JobId, ResultLocator, StylizationRequest};
use stylizer_logging::{stylizer_debug, stylizer_info, stylizer_warn};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::poller::{poll_until_terminal, PollSettings};
use crate::{EngineEvent, StyleService};

/// Receives events from engine tasks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events into an unbounded channel. Sending never blocks a poll
/// loop; the receiver is expected to keep draining.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        // The receiver is gone only after teardown; late events are moot.
        let _ = self.tx.send(event);
    }
}

/// The one task (submission or poll loop) allowed to run for the current job.
struct JobTask {
    job_id: JobId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl JobTask {
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Executes IO on behalf of the state machine.
///
/// Holds a single job slot: starting a submission or a poll loop always
/// cancels whatever occupied the slot first, so two loops never overlap.
/// Preset and result downloads run beside it and are aborted on shutdown.
/// All methods must be called from within a Tokio runtime.
pub struct EngineHandle {
    service: Arc<dyn StyleService>,
    poll: PollSettings,
    sink: Arc<dyn EventSink>,
    slot: Option<JobTask>,
    background: JoinSet<()>,
    closed: bool,
}

impl EngineHandle {
    pub fn new(
        service: Arc<dyn StyleService>,
        poll: PollSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            service,
            poll,
            sink,
            slot: None,
            background: JoinSet::new(),
            closed: false,
        }
    }

    pub fn submit(&mut self, job_id: JobId, request: StylizationRequest) {
        if self.refuse_when_closed("submit") {
            return;
        }
        self.cancel_job();

        let service = self.service.clone();
        let sink = self.sink.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                result = service.submit(request) => result,
            };
            match &result {
                Ok(handle) => stylizer_info!("Job {} accepted as {}", job_id, handle),
                Err(err) => stylizer_warn!("Job {} submission failed: {}", job_id, err),
            }
            sink.emit(EngineEvent::Submitted { job_id, result });
        });
        self.slot = Some(JobTask {
            job_id,
            cancel,
            task,
        });
    }

    pub fn start_polling(&mut self, job_id: JobId, handle: JobHandle) {
        if self.refuse_when_closed("start polling") {
            return;
        }
        self.cancel_job();

        stylizer_debug!(
            "Polling job {} ({}) every {:?}",
            job_id,
            handle,
            self.poll.interval
        );
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_until_terminal(
            self.service.clone(),
            job_id,
            handle,
            self.poll.clone(),
            self.sink.clone(),
            cancel.clone(),
        ));
        self.slot = Some(JobTask {
            job_id,
            cancel,
            task,
        });
    }

    /// Stops the submission or poll loop in the job slot, if any.
    pub fn cancel_job(&mut self) {
        if let Some(job) = self.slot.take() {
            if !job.task.is_finished() {
                stylizer_debug!("Cancelling task for job {}", job.job_id);
            }
            job.stop();
        }
    }

    pub fn fetch_preset(&mut self, url: String) {
        if self.refuse_when_closed("fetch preset") {
            return;
        }
        self.reap_background();
        let service = self.service.clone();
        let sink = self.sink.clone();
        self.background.spawn(async move {
            let result = service.fetch_preset(&url).await;
            if let Err(err) = &result {
                stylizer_warn!("Preset download {} failed: {}", url, err);
            }
            sink.emit(EngineEvent::PresetFetched { url, result });
        });
    }

    pub fn fetch_result(&mut self, job_id: JobId, locator: ResultLocator) {
        if self.refuse_when_closed("fetch result") {
            return;
        }
        self.reap_background();
        let service = self.service.clone();
        let sink = self.sink.clone();
        self.background.spawn(async move {
            let result = service.fetch_result(&locator).await;
            if let Err(err) = &result {
                stylizer_warn!("Result download {} failed: {}", locator, err);
            }
            sink.emit(EngineEvent::ResultFetched { job_id, result });
        });
    }

    /// Job generation whose task is still running in the slot.
    pub fn active_job(&self) -> Option<JobId> {
        self.slot
            .as_ref()
            .filter(|job| !job.task.is_finished())
            .map(|job| job.job_id)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Cancels every task and refuses new work. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if !self.closed {
            stylizer_debug!("Engine shutting down");
        }
        self.closed = true;
        self.cancel_job();
        self.background.abort_all();
    }

    fn refuse_when_closed(&self, what: &str) -> bool {
        if self.closed {
            stylizer_warn!("Ignoring {} after shutdown", what);
        }
        self.closed
    }

    fn reap_background(&mut self) {
        while self.background.try_join_next().is_some() {}
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
