#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use stylizer_app::{LifecycleController, Observer};
use stylizer_core::{
    AppViewModel, Asset, JobHandle, JobStatus, Msg, Phase, ResultLocator, StylizationRequest,
};
use stylizer_engine::{FetchError, PollError, PollSettings, StyleService, SubmissionError};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(stylizer_logging::initialize_for_tests);
}

pub fn handle(id: &str) -> JobHandle {
    JobHandle::new(id).unwrap()
}

pub fn jpeg(name: &str) -> Asset {
    Asset::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// Stand-in for the remote service. Submissions and status answers come from
/// per-call scripts; a handle with no script left keeps answering pending.
#[derive(Default)]
pub struct ScriptedService {
    submits: Mutex<VecDeque<Result<JobHandle, SubmissionError>>>,
    statuses: Mutex<HashMap<String, VecDeque<Result<JobStatus, PollError>>>>,
    results: Mutex<HashMap<String, Result<Vec<u8>, FetchError>>>,
    checks: Mutex<Vec<String>>,
    submitted: Mutex<Vec<StylizationRequest>>,
    submit_delay: Option<Duration>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(self, task_id: &str) -> Self {
        self.submits.lock().unwrap().push_back(Ok(handle(task_id)));
        self
    }

    /// Every submission takes `delay` before it answers.
    pub fn slow_submit(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn reject(self, error: SubmissionError) -> Self {
        self.submits.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn statuses(self, task_id: &str, answers: Vec<Result<JobStatus, PollError>>) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .entry(task_id.to_string())
            .or_default()
            .extend(answers);
        self
    }

    pub fn result(self, locator: &str, answer: Result<Vec<u8>, FetchError>) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(locator.to_string(), answer);
        self
    }

    pub fn checks_for(&self, task_id: &str) -> usize {
        self.checks
            .lock()
            .unwrap()
            .iter()
            .filter(|id| *id == task_id)
            .count()
    }

    pub fn total_checks(&self) -> usize {
        self.checks.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<StylizationRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StyleService for ScriptedService {
    async fn submit(&self, request: StylizationRequest) -> Result<JobHandle, SubmissionError> {
        self.submitted.lock().unwrap().push(request);
        let answer = self
            .submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmissionError::Connectivity("no script".to_string())));
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, PollError> {
        self.checks.lock().unwrap().push(handle.as_str().to_string());
        self.statuses
            .lock()
            .unwrap()
            .get_mut(handle.as_str())
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(JobStatus::Pending))
    }

    async fn fetch_result(&self, locator: &ResultLocator) -> Result<Vec<u8>, FetchError> {
        self.results
            .lock()
            .unwrap()
            .get(locator.as_str())
            .cloned()
            .unwrap_or(Err(FetchError::HttpStatus(404)))
    }

    async fn fetch_preset(&self, url: &str) -> Result<Asset, FetchError> {
        if url.contains("missing") {
            return Err(FetchError::HttpStatus(404));
        }
        let name = url.rsplit('/').next().unwrap_or("preset");
        Ok(Asset::new(name, "image/jpeg", vec![1, 2, 3]))
    }
}

/// Records everything the controller reports.
#[derive(Default)]
pub struct RecordingObserver {
    transitions: Mutex<Vec<(Phase, Phase)>>,
    views: Mutex<Vec<AppViewModel>>,
}

impl RecordingObserver {
    pub fn transitions(&self) -> Vec<(Phase, Phase)> {
        self.transitions.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.views
            .lock()
            .unwrap()
            .last()
            .map(|view| view.status_message.clone())
    }
}

impl Observer for RecordingObserver {
    fn transition(&self, from: &Phase, to: &Phase) {
        self.transitions
            .lock()
            .unwrap()
            .push((from.clone(), to.clone()));
    }

    fn render(&self, view: &AppViewModel) {
        self.views.lock().unwrap().push(view.clone());
    }
}

pub struct Harness {
    pub service: Arc<ScriptedService>,
    pub observer: Arc<RecordingObserver>,
    pub controller: LifecycleController,
}

pub fn harness(service: ScriptedService) -> Harness {
    harness_with(service, PollSettings::default())
}

pub fn harness_with(service: ScriptedService, poll: PollSettings) -> Harness {
    init_logging();
    let service = Arc::new(service);
    let observer = Arc::new(RecordingObserver::default());
    let controller = LifecycleController::new(service.clone(), poll, observer.clone());
    Harness {
        service,
        observer,
        controller,
    }
}

/// Content and style in place, ready for a stylize click.
pub fn load_assets(controller: &mut LifecycleController) {
    controller.dispatch(Msg::ContentSelected(jpeg("building.jpeg")));
    controller.dispatch(Msg::StyleUploaded(jpeg("van_gogh.jpeg")));
}
