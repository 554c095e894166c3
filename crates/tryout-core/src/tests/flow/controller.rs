use crate::{
    AnswerAudio, AuditionController, CompletionReason, Effect, FlowError, FlowEvent, Notice,
    Question, Session,
};

use std::time::Duration;

fn question(id: &str, secs: u64) -> Question {
    Question {
        id: id.to_string(),
        prompt: format!("Prompt for {id}"),
        time_limit: Duration::from_secs(secs),
    }
}

#[allow(clippy::unwrap_used)]
fn session(count: usize, secs: u64) -> Session {
    let questions = (1..=count)
        .map(|n| question(&format!("q{n}"), secs))
        .collect();
    Session::new("talent-1".into(), "opp-1".into(), Some("sub-1".into()), questions).unwrap()
}

/// A started controller over `count` questions of `q_secs` each.
#[allow(clippy::unwrap_used)]
fn started(count: usize, q_secs: u64, exam_secs: u64) -> AuditionController {
    let mut controller =
        AuditionController::new(session(count, q_secs), Duration::from_secs(exam_secs));
    let effects = controller.start().unwrap();
    assert!(matches!(effects.as_slice(), [Effect::StartRecording]));
    controller
}

fn take(question_id: &str) -> AnswerAudio {
    AnswerAudio::wav(question_id, vec![1, 2, 3, 4])
}

fn tick_n(controller: &mut AuditionController, n: u64) -> Vec<Effect> {
    let mut effects = Vec::new();
    for _ in 0..n {
        effects.extend(controller.handle(FlowEvent::Tick));
    }
    effects
}

/// Question ids of all uploads among `effects`.
fn uploads(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Upload(request) => Some(request.question_id.clone()),
            _ => None,
        })
        .collect()
}

/// WHAT: start() auto-starts recording and both countdowns
/// WHY: Recording is never user-initiated in an audition
#[test]
#[allow(clippy::unwrap_used)]
fn given_new_controller_when_started_then_recording_and_clocks_begin() {
    // Given/When: A freshly started controller
    let mut controller = started(3, 90, 1800);

    // Then: Question 0 is active, recording, with both clocks armed
    assert_eq!(controller.current_index(), 0);
    assert!(controller.recording_state().is_recording());
    assert_eq!(controller.exam_remaining_secs(), 1800);
    assert_eq!(controller.question_remaining_secs(), 90);

    // And: A tick moves both clocks
    let _ = controller.handle(FlowEvent::Tick);
    assert_eq!(controller.exam_remaining_secs(), 1799);
    assert_eq!(controller.question_remaining_secs(), 89);
}

/// WHAT: A second start() is rejected
/// WHY: Auditions cannot be paused or restarted
#[test]
fn given_started_controller_when_started_again_then_already_started_error() {
    let mut controller = started(1, 90, 1800);

    let result = controller.start();

    assert!(matches!(result, Err(FlowError::AlreadyStarted { .. })));
}

/// WHAT: Manual stop parks the take and freezes the question clock
/// WHY: Stopping gives the talent time to submit without racing the timer
#[test]
fn given_live_recording_when_user_stops_then_clock_freezes_and_no_upload() {
    // Given: A controller 10 seconds into question 1
    let mut controller = started(3, 90, 1800);
    let _ = tick_n(&mut controller, 10);

    // When: The user stops and the recorder delivers the take
    let stop_effects = controller.handle(FlowEvent::StopPressed);
    let stopped_effects = controller.handle(FlowEvent::RecordingStopped(take("q1")));

    // Then: The recorder was told to stop, nothing was uploaded
    assert!(matches!(stop_effects.as_slice(), [Effect::StopRecording]));
    assert!(uploads(&stopped_effects).is_empty());
    assert!(controller.recording_state().recorded_audio().is_some());

    // And: The question clock no longer moves
    let before = controller.question_remaining_secs();
    let _ = tick_n(&mut controller, 5);
    assert_eq!(controller.question_remaining_secs(), before);
}

/// WHAT: Stop at 40s remaining on question 2, then advance, uploads once
/// WHY: Exactly one upload per answered question is the core guarantee
#[test]
fn given_question_two_stopped_early_when_advancing_then_single_upload_then_question_three() {
    // Given: Question 1 answered and uploaded
    let mut controller = started(3, 90, 1800);
    let _ = controller.handle(FlowEvent::StopPressed);
    let _ = controller.handle(FlowEvent::RecordingStopped(take("q1")));
    let _ = controller.handle(FlowEvent::AdvancePressed);
    let _ = controller.handle(FlowEvent::UploadSucceeded);
    assert_eq!(controller.current_index(), 1);

    // And: Question 2 stopped with 40 seconds remaining
    let _ = tick_n(&mut controller, 50);
    assert_eq!(controller.question_remaining_secs(), 40);
    let _ = controller.handle(FlowEvent::StopPressed);
    let _ = controller.handle(FlowEvent::RecordingStopped(take("q2")));

    // When: The user advances
    let advance_effects = controller.handle(FlowEvent::AdvancePressed);

    // Then: Exactly one upload fires, for question 2
    assert_eq!(uploads(&advance_effects), vec!["q2".to_string()]);

    // And: Question 3 becomes active only after the upload succeeds
    assert_eq!(controller.current_index(), 1);
    let success_effects = controller.handle(FlowEvent::UploadSucceeded);
    assert_eq!(controller.current_index(), 2);
    assert_eq!(controller.current_question().id, "q3");
    assert!(
        success_effects
            .iter()
            .any(|e| matches!(e, Effect::StartRecording))
    );
}

/// WHAT: Question timeout while recording stops the take and auto-submits
/// WHY: The deadline must not require user interaction to submit
#[test]
fn given_live_recording_when_question_times_out_then_stop_then_upload() {
    // Given: A controller left recording for the full limit
    let mut controller = started(2, 90, 1800);

    // When: The question clock expires
    let timeout_effects = tick_n(&mut controller, 90);

    // Then: The recorder is stopped, nothing uploaded yet
    assert!(
        timeout_effects
            .iter()
            .any(|e| matches!(e, Effect::StopRecording))
    );
    assert!(uploads(&timeout_effects).is_empty());

    // And: The payload arriving triggers the upload with no user event
    let stopped_effects = controller.handle(FlowEvent::RecordingStopped(take("q1")));
    assert_eq!(uploads(&stopped_effects), vec!["q1".to_string()]);
}

/// WHAT: Question timeout with no recording skips without uploading
/// WHY: Unanswered questions are skipped, never submitted empty
#[test]
fn given_failed_recorder_when_question_times_out_then_skipped_no_upload() {
    // Given: Recording never started on question 1
    let mut controller = started(2, 90, 1800);
    let failed_effects = controller.handle(FlowEvent::RecordingFailed("mic busy".into()));
    assert!(failed_effects.iter().any(|e| matches!(
        e,
        Effect::Notify(Notice::RecorderFailed { .. })
    )));

    // When: The question clock expires
    let timeout_effects = tick_n(&mut controller, 90);

    // Then: The question is skipped with no upload, question 2 is active
    assert!(timeout_effects.iter().any(
        |e| matches!(e, Effect::QuestionSkipped { question_id } if question_id == "q1")
    ));
    assert!(uploads(&timeout_effects).is_empty());
    assert_eq!(controller.current_index(), 1);
}

/// WHAT: A timed-out take with no audio is skipped, not uploaded
/// WHY: Empty payloads must never reach the upload endpoint
#[test]
fn given_empty_take_when_question_times_out_then_skipped() {
    // Given: A timeout-driven stop that yields an empty payload
    let mut controller = started(2, 90, 1800);
    let _ = tick_n(&mut controller, 90);

    // When: The recorder delivers an empty take
    let effects = controller.handle(FlowEvent::RecordingStopped(AnswerAudio::wav(
        "q1",
        Vec::new(),
    )));

    // Then: Skip, no upload, next question active
    assert!(effects.iter().any(|e| matches!(e, Effect::QuestionSkipped { .. })));
    assert!(uploads(&effects).is_empty());
    assert_eq!(controller.current_index(), 1);
}

/// WHAT: Exam expiry ends the session in any state
/// WHY: The exam-wide budget is unconditional
#[test]
fn given_live_recording_when_exam_expires_then_session_ends_immediately() {
    // Given: A short 10-second exam over long questions
    let mut controller = started(3, 90, 10);

    // When: The exam clock expires mid-recording
    let effects = tick_n(&mut controller, 10);

    // Then: The microphone is released and the session is complete
    assert!(effects.iter().any(|e| matches!(e, Effect::StopRecording)));
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::SessionComplete(CompletionReason::ExamTimeUp)
    )));
    assert_eq!(controller.completion(), Some(CompletionReason::ExamTimeUp));

    // And: Further events are ignored
    assert!(controller.handle(FlowEvent::AdvancePressed).is_empty());
    assert!(controller.handle(FlowEvent::Tick).is_empty());
}

/// WHAT: Three untouched questions are handled in order, then completion
/// WHY: The hands-off path must walk every question exactly once
#[test]
fn given_user_never_stops_when_all_questions_time_out_then_ordered_run_to_completion() {
    // Given: 3 questions of 90 seconds, the user never intervenes
    let mut controller = started(3, 90, 1800);
    let mut upload_order = Vec::new();
    let mut last_index = 0;

    // When: Each question times out, auto-stops and auto-submits
    for n in 1..=3 {
        let question_id = format!("q{n}");
        let _ = tick_n(&mut controller, 90);
        let effects = controller.handle(FlowEvent::RecordingStopped(take(&question_id)));
        upload_order.extend(uploads(&effects));
        let _ = controller.handle(FlowEvent::UploadSucceeded);

        // Index is non-decreasing and bounded throughout
        assert!(controller.current_index() >= last_index);
        assert!(controller.current_index() < 3);
        last_index = controller.current_index();
    }

    // Then: Uploads ran in question order and the session completed
    assert_eq!(upload_order, vec!["q1", "q2", "q3"]);
    assert_eq!(
        controller.completion(),
        Some(CompletionReason::AllQuestionsHandled)
    );
}

/// WHAT: A failed upload keeps the question and allows a retry
/// WHY: Upload failures block advancement but are recoverable by the user
#[test]
fn given_failed_upload_when_user_retries_then_second_upload_same_question() {
    // Given: An upload in flight for question 1
    let mut controller = started(2, 90, 1800);
    let _ = controller.handle(FlowEvent::StopPressed);
    let _ = controller.handle(FlowEvent::RecordingStopped(take("q1")));
    let first = controller.handle(FlowEvent::AdvancePressed);
    assert_eq!(uploads(&first), vec!["q1".to_string()]);

    // When: The upload fails
    let failed = controller.handle(FlowEvent::UploadFailed("backend unavailable".into()));

    // Then: The failure is surfaced and the question is unchanged
    assert!(failed.iter().any(|e| matches!(
        e,
        Effect::Notify(Notice::UploadFailed { .. })
    )));
    assert_eq!(controller.current_index(), 0);
    assert!(!controller.is_uploading());

    // And: Retrying uploads the same parked answer once more
    let retry = controller.handle(FlowEvent::AdvancePressed);
    assert_eq!(uploads(&retry), vec!["q1".to_string()]);
}

/// WHAT: Stop and advance are ignored while an upload is in flight
/// WHY: A second concurrent upload for one question must be impossible
#[test]
fn given_upload_in_flight_when_user_acts_then_inputs_ignored() {
    // Given: An upload in flight
    let mut controller = started(2, 90, 1800);
    let _ = controller.handle(FlowEvent::StopPressed);
    let _ = controller.handle(FlowEvent::RecordingStopped(take("q1")));
    let _ = controller.handle(FlowEvent::AdvancePressed);
    assert!(controller.is_uploading());

    // When/Then: Stop and advance produce no effects
    assert!(controller.handle(FlowEvent::StopPressed).is_empty());
    assert!(controller.handle(FlowEvent::AdvancePressed).is_empty());
}

/// WHAT: Advance without a finished recording is rejected locally
/// WHY: The missing-payload precondition fails before any network request
#[test]
fn given_live_recording_when_advancing_then_missing_answer_notice() {
    // Given: Question 1 still recording
    let mut controller = started(2, 90, 1800);

    // When: The user tries to advance
    let effects = controller.handle(FlowEvent::AdvancePressed);

    // Then: A notice, no upload
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Notify(Notice::MissingAnswer)
    )));
    assert!(uploads(&effects).is_empty());
    assert_eq!(controller.current_index(), 0);
}

/// WHAT: An empty parked take cannot be advanced
/// WHY: Empty payloads are a local precondition failure, not a network error
#[test]
fn given_empty_parked_take_when_advancing_then_missing_answer_notice() {
    // Given: A manual stop that yielded an empty payload
    let mut controller = started(2, 90, 1800);
    let _ = controller.handle(FlowEvent::StopPressed);
    let _ = controller.handle(FlowEvent::RecordingStopped(AnswerAudio::wav("q1", Vec::new())));

    // When: The user tries to advance
    let effects = controller.handle(FlowEvent::AdvancePressed);

    // Then: A notice, no upload
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Notify(Notice::MissingAnswer)
    )));
    assert!(uploads(&effects).is_empty());
}

/// WHAT: A take lost on stop skips the question instead of wedging it
/// WHY: With the clock frozen and nothing to submit, skipping is the only
///      path forward
#[test]
fn given_recorder_failure_on_stop_when_take_is_lost_then_question_skipped() {
    // Given: A manual stop
    let mut controller = started(2, 90, 1800);
    let _ = controller.handle(FlowEvent::StopPressed);

    // When: The recorder fails instead of delivering the take
    let effects = controller.handle(FlowEvent::RecordingFailed("stream died".into()));

    // Then: The failure is surfaced, the question skipped, next one active
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Notify(Notice::RecorderFailed { .. })
    )));
    assert!(effects.iter().any(
        |e| matches!(e, Effect::QuestionSkipped { question_id } if question_id == "q1")
    ));
    assert_eq!(controller.current_index(), 1);
}

/// WHAT: Overtime is derived from the question clock's final stretch
/// WHY: The warning is presentation-only and must track remaining time
#[test]
fn given_question_clock_when_under_thirty_seconds_then_overtime() {
    // Given: A 40-second question
    let mut controller = started(1, 40, 1800);
    assert!(!controller.overtime());

    // When: Ticking into the final stretch
    let _ = tick_n(&mut controller, 10);

    // Then: Overtime is on at 30 seconds remaining
    assert_eq!(controller.question_remaining_secs(), 30);
    assert!(controller.overtime());
}
