use std::sync::Once;

use pretty_assertions::assert_eq;
use stylizer_core::{
    empty_asset_message, update, AppState, Asset, AssetRole, Effect, FailureReason, Intensity,
    JobHandle, JobStatus, Msg, Phase, Resolution, ResultLocator, MSG_DONE, MSG_MISSING_ASSETS,
    MSG_PROCESSING, MSG_SERVER_FAILED, MSG_STATUS_FAILED, MSG_SUBMIT_FAILED, MSG_UPLOADING,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(stylizer_logging::initialize_for_tests);
}

fn jpeg(name: &str) -> Asset {
    Asset::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

fn handle(id: &str) -> JobHandle {
    JobHandle::new(id).unwrap()
}

fn ready_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::ContentSelected(jpeg("content.jpg")));
    let (state, _) = update(state, Msg::StyleUploaded(jpeg("style.jpg")));
    state
}

fn polling_state(task_id: &str) -> AppState {
    let (state, _) = update(ready_state(), Msg::StylizeClicked);
    let job_id = state.current_job();
    let (state, _) = update(
        state,
        Msg::SubmissionAccepted {
            job_id,
            handle: handle(task_id),
        },
    );
    state
}

fn transitions(effects: &[Effect]) -> Vec<(Phase, Phase)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Transition { from, to } => Some((from.clone(), to.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn stylize_without_both_assets_only_sets_message() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ContentSelected(jpeg("content.jpg")));
    let (state, effects) = update(state, Msg::StylizeClicked);

    assert!(effects.is_empty());
    assert_eq!(*state.phase(), Phase::Idle);
    assert_eq!(state.view().status_message, MSG_MISSING_ASSETS);
}

#[test]
fn stylize_with_empty_asset_is_refused() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ContentSelected(jpeg("content.jpg")));
    let (state, _) = update(state, Msg::StyleUploaded(Asset::new("s.png", "image/png", vec![])));
    let (state, effects) = update(state, Msg::StylizeClicked);

    assert!(effects.is_empty());
    assert_eq!(*state.phase(), Phase::Idle);
    assert_eq!(
        state.view().status_message,
        "The selected style image is empty. Please choose another file."
    );
    assert_eq!(
        state.view().status_message,
        empty_asset_message(AssetRole::Style)
    );
}

#[test]
fn empty_content_image_is_named() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ContentSelected(Asset::new("c.jpg", "image/jpeg", Vec::new())),
    );
    let (state, _) = update(state, Msg::StyleUploaded(jpeg("style.jpg")));
    let (state, effects) = update(state, Msg::StylizeClicked);

    assert!(effects.is_empty());
    assert_eq!(
        state.view().status_message,
        empty_asset_message(AssetRole::Content)
    );
}

#[test]
fn stylize_from_idle_submits_with_mapped_weight() {
    init_logging();
    let (state, _) = update(ready_state(), Msg::IntensityChanged(Intensity::MAX));
    let (state, _) = update(state, Msg::ResolutionChanged(Resolution::Px1024));
    let (mut state, effects) = update(state, Msg::StylizeClicked);

    assert_eq!(*state.phase(), Phase::Submitting);
    assert!(state.view().is_loading);
    assert_eq!(state.view().status_message, MSG_UPLOADING);
    assert!(state.consume_dirty());

    assert_eq!(effects.len(), 2);
    assert_eq!(
        effects[0],
        Effect::Transition {
            from: Phase::Idle,
            to: Phase::Submitting
        }
    );
    match &effects[1] {
        Effect::Submit { job_id, request } => {
            assert_eq!(*job_id, 1);
            assert_eq!(request.style_weight(), 10_000_000);
            assert_eq!(request.resolution(), Resolution::Px1024);
            assert_eq!(request.content().file_name, "content.jpg");
            assert_eq!(request.style().file_name, "style.jpg");
        }
        other => panic!("expected submit, got {other:?}"),
    }
}

#[test]
fn accepted_submission_starts_polling() {
    init_logging();
    let (state, _) = update(ready_state(), Msg::StylizeClicked);
    let (state, effects) = update(
        state,
        Msg::SubmissionAccepted {
            job_id: 1,
            handle: handle("T1"),
        },
    );

    assert_eq!(*state.phase(), Phase::Polling(handle("T1")));
    assert_eq!(state.view().status_message, MSG_PROCESSING);
    assert_eq!(
        effects,
        vec![
            Effect::Transition {
                from: Phase::Submitting,
                to: Phase::Polling(handle("T1")),
            },
            Effect::StartPolling {
                job_id: 1,
                handle: handle("T1"),
            },
        ]
    );
}

#[test]
fn pending_status_changes_nothing() {
    init_logging();
    let mut state = polling_state("T1");
    assert!(state.consume_dirty());
    let before = state.clone();

    let (mut state, effects) = update(
        state,
        Msg::StatusObserved {
            job_id: 1,
            status: JobStatus::Pending,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(!state.consume_dirty());
}

#[test]
fn complete_status_succeeds_and_stops_loop() {
    init_logging();
    let locator = ResultLocator::new("/result/T1.jpg");
    let (state, effects) = update(
        polling_state("T1"),
        Msg::StatusObserved {
            job_id: 1,
            status: JobStatus::Complete(locator.clone()),
        },
    );

    assert_eq!(*state.phase(), Phase::Succeeded(locator.clone()));
    assert!(!state.view().is_loading);
    assert_eq!(state.view().status_message, MSG_DONE);
    assert_eq!(
        effects,
        vec![
            Effect::CancelJob,
            Effect::Transition {
                from: Phase::Polling(handle("T1")),
                to: Phase::Succeeded(locator),
            },
        ]
    );
}

#[test]
fn server_failure_is_terminal() {
    init_logging();
    let (state, effects) = update(
        polling_state("T1"),
        Msg::StatusObserved {
            job_id: 1,
            status: JobStatus::Failed,
        },
    );

    assert_eq!(*state.phase(), Phase::Failed(FailureReason::ServerReported));
    assert_eq!(state.phase().to_string(), "Failed(server reported failure)");
    assert_eq!(state.view().status_message, MSG_SERVER_FAILED);
    assert_eq!(effects[0], Effect::CancelJob);
}

#[test]
fn submission_failure_goes_straight_to_failed() {
    init_logging();
    let (state, first) = update(ready_state(), Msg::StylizeClicked);
    let (state, second) = update(
        state,
        Msg::SubmissionFailed {
            job_id: 1,
            error: "connection refused".to_string(),
        },
    );

    assert_eq!(*state.phase(), Phase::Failed(FailureReason::Submission));
    assert_eq!(state.view().status_message, MSG_SUBMIT_FAILED);
    assert!(!state.view().is_loading);

    let mut seen = transitions(&first);
    seen.extend(transitions(&second));
    assert_eq!(
        seen,
        vec![
            (Phase::Idle, Phase::Submitting),
            (Phase::Submitting, Phase::Failed(FailureReason::Submission)),
        ]
    );
    assert!(!second
        .iter()
        .any(|effect| matches!(effect, Effect::StartPolling { .. })));
}

#[test]
fn status_check_error_then_resubmit_is_accepted() {
    init_logging();
    let (state, _) = update(
        polling_state("T1"),
        Msg::StatusObserved {
            job_id: 1,
            status: JobStatus::Pending,
        },
    );
    let (state, _) = update(
        state,
        Msg::StatusCheckFailed {
            job_id: 1,
            error: "timeout".to_string(),
        },
    );
    assert_eq!(*state.phase(), Phase::Failed(FailureReason::StatusCheck));
    assert_eq!(state.view().status_message, MSG_STATUS_FAILED);

    let (state, effects) = update(state, Msg::StylizeClicked);
    assert_eq!(*state.phase(), Phase::Submitting);
    assert_eq!(
        transitions(&effects),
        vec![
            (Phase::Failed(FailureReason::StatusCheck), Phase::Idle),
            (Phase::Idle, Phase::Submitting),
        ]
    );
    // Nothing is running after a failure, so there is nothing to cancel.
    assert!(!effects.contains(&Effect::CancelJob));
    assert!(matches!(
        effects.last(),
        Some(Effect::Submit { job_id: 2, .. })
    ));
}

#[test]
fn new_submission_while_polling_cancels_first() {
    init_logging();
    let (state, effects) = update(polling_state("T1"), Msg::StylizeClicked);

    assert_eq!(effects[0], Effect::CancelJob);
    assert_eq!(
        transitions(&effects),
        vec![
            (Phase::Polling(handle("T1")), Phase::Idle),
            (Phase::Idle, Phase::Submitting),
        ]
    );
    assert!(matches!(
        effects.last(),
        Some(Effect::Submit { job_id: 2, .. })
    ));
    assert_eq!(state.current_job(), 2);
}

#[test]
fn answers_for_superseded_job_are_dropped() {
    init_logging();
    let (state, _) = update(polling_state("T1"), Msg::StylizeClicked);
    let (state, _) = update(
        state,
        Msg::SubmissionAccepted {
            job_id: 2,
            handle: handle("T2"),
        },
    );
    let before = state.clone();

    let (state, effects) = update(
        state,
        Msg::StatusObserved {
            job_id: 1,
            status: JobStatus::Complete(ResultLocator::new("/result/T1.jpg")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, effects) = update(
        state,
        Msg::SubmissionAccepted {
            job_id: 1,
            handle: handle("T1"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), Phase::Polling(handle("T2")));
}

#[test]
fn settings_are_locked_while_loading() {
    init_logging();
    let state = polling_state("T1");
    let before = state.view();

    let (state, _) = update(state, Msg::IntensityChanged(Intensity::MIN));
    let (state, _) = update(state, Msg::ResolutionChanged(Resolution::Px128));

    assert_eq!(state.view().intensity, before.intensity);
    assert_eq!(state.view().resolution, before.resolution);
}

#[test]
fn exhausted_polling_fails_with_attempt_count() {
    init_logging();
    let (state, effects) = update(
        polling_state("T1"),
        Msg::PollingExhausted {
            job_id: 1,
            attempts: 20,
        },
    );

    assert_eq!(*state.phase(), Phase::Failed(FailureReason::PollingGaveUp));
    assert_eq!(
        state.view().status_message,
        "Gave up waiting for the server after 20 status checks."
    );
    assert_eq!(effects[0], Effect::CancelJob);
}

#[test]
fn reset_cancels_and_returns_to_idle() {
    init_logging();
    let (state, effects) = update(polling_state("T1"), Msg::Reset);

    assert_eq!(*state.phase(), Phase::Idle);
    assert_eq!(
        effects,
        vec![
            Effect::CancelJob,
            Effect::Transition {
                from: Phase::Polling(handle("T1")),
                to: Phase::Idle,
            },
        ]
    );

    // A straggling answer from the cancelled loop must not revive it.
    let (state, effects) = update(
        state,
        Msg::StatusObserved {
            job_id: 1,
            status: JobStatus::Failed,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), Phase::Idle);
}
