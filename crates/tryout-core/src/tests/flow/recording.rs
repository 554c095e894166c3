use crate::{AnswerAudio, RecordingState};

use std::time::Instant;

/// WHAT: WAV payloads are named after their question
/// WHY: The backend files each answer by question id
#[test]
fn given_question_id_when_wrapping_wav_then_name_and_mime_are_set() {
    // Given/When: A WAV payload for question q3
    let audio = AnswerAudio::wav("q3", vec![0, 1, 2, 3]);

    // Then: File name and mime type follow the upload contract
    assert_eq!(audio.file_name(), "answer_q3.wav");
    assert_eq!(audio.mime_type(), "audio/wav");
    assert_eq!(audio.len(), 4);
    assert!(!audio.is_empty());
}

/// WHAT: An empty payload reports as empty
/// WHY: The upload precondition gates on this before any network call
#[test]
fn given_no_bytes_when_wrapping_then_payload_is_empty() {
    let audio = AnswerAudio::wav("q1", Vec::new());

    assert!(audio.is_empty());
    assert_eq!(audio.len(), 0);
}

/// WHAT: Recording state accessors reflect the lifecycle
/// WHY: The driver renders status from these without matching variants
#[test]
fn given_each_state_when_queried_then_accessors_agree() {
    // Given: One state per lifecycle stage
    let idle = RecordingState::Idle;
    let recording = RecordingState::Recording {
        started_at: Instant::now(),
    };
    let recorded = RecordingState::Recorded {
        audio: AnswerAudio::wav("q1", vec![9]),
    };

    // When/Then: Only Recording is live, only Recorded holds audio
    assert!(!idle.is_recording());
    assert!(recording.is_recording());
    assert!(!recorded.is_recording());

    assert!(idle.recorded_audio().is_none());
    assert!(recording.recorded_audio().is_none());
    assert!(recorded.recorded_audio().is_some());
}
