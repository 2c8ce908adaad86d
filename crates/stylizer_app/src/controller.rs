use std::path::{Path, PathBuf};
use std::sync::Arc;

use stylizer_core::{update, AppState, AppViewModel, Effect, JobId, Msg, Phase};
use stylizer_engine::{
    ArtifactStore, ChannelEventSink, EngineEvent, EngineHandle, PersistError, PollSettings,
    ReqwestStyleService, SetupError, StyleService,
};
use stylizer_logging::{stylizer_info, stylizer_warn};
use tokio::sync::mpsc;

use crate::effects::{map_event, EffectRunner};
use crate::{Observer, StylizerConfig};

/// Owns the lifecycle state and the engine that executes its effects.
///
/// Every change goes through [`LifecycleController::dispatch`], which runs
/// the pure update and then applies the effects in order, so a cancellation
/// always lands before the task that replaces it is spawned. Engine tasks
/// report back over a channel drained by [`LifecycleController::next_event`].
///
/// The channel is unbounded. While a job stays pending the poll loop queues
/// one status event per interval, so an embedding that stops calling
/// `next_event` accumulates them until the job turns terminal or is
/// cancelled; the backlog is replayed in order on the next drain, where the
/// pending answers are no-ops.
///
/// [`LifecycleController::dispose`] tears everything down; it is idempotent
/// and also runs on drop. Must be used from within a Tokio runtime.
pub struct LifecycleController {
    state: AppState,
    runner: EffectRunner,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    observer: Arc<dyn Observer>,
    disposed: bool,
}

impl LifecycleController {
    pub fn new(
        service: Arc<dyn StyleService>,
        poll: PollSettings,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = EngineHandle::new(service, poll, Arc::new(ChannelEventSink::new(event_tx)));
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(engine),
            events,
            observer,
            disposed: false,
        }
    }

    /// Controller talking to the real service described by `config`.
    pub fn from_config(
        config: &StylizerConfig,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, SetupError> {
        let service = ReqwestStyleService::new(config.service.clone())?;
        Ok(Self::new(Arc::new(service), config.poll.clone(), observer))
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    pub fn artifact(&self) -> Option<&[u8]> {
        self.state.artifact()
    }

    /// Job whose submission or poll loop is currently running, if any.
    pub fn active_job(&self) -> Option<JobId> {
        self.runner.active_job()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if self.disposed {
            stylizer_warn!("Dropping {:?} after dispose", msg);
            return;
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;

        for effect in effects {
            match effect {
                Effect::Transition { from, to } => self.observer.transition(&from, &to),
                other => self.runner.run(other),
            }
        }
        if dirty {
            self.observer.render(&self.state.view());
        }
    }

    /// Waits for one engine event and applies it. Returns `false` once the
    /// controller is disposed and nothing more can arrive.
    pub async fn next_event(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        match self.events.recv().await {
            Some(event) => {
                self.dispatch(map_event(event));
                true
            }
            None => false,
        }
    }

    /// Applies engine events until no task owes the state an answer: the job
    /// is terminal or idle and no preset or result download is outstanding.
    pub async fn run_until_settled(&mut self) {
        while self.state.awaiting_engine() && self.next_event().await {}
    }

    /// Saves the downloaded artifact into `dir` under its default name.
    pub fn save_artifact(&self, dir: &Path) -> Result<PathBuf, PersistError> {
        let path = ArtifactStore::new(dir).save(self.state.artifact())?;
        stylizer_info!("Saved result to {}", path.display());
        Ok(path)
    }

    /// Cancels any poll loop or download, returns to idle and refuses
    /// further messages. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.dispatch(Msg::Reset);
        self.runner.shutdown();
        self.events.close();
        self.disposed = true;
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        self.dispose();
    }
}
