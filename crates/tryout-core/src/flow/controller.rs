//! Audition flow controller.
//!
//! An explicit finite-state machine over the per-question recording
//! lifecycle and both countdowns. Events arrive one at a time (the driver's
//! channel is the queue) and each is answered with the side effects the
//! driver must execute: start or stop the recorder, upload an answer, or
//! end the session. The controller never touches the recorder or the
//! network itself, which keeps every transition deterministic and
//! testable without timers.

use crate::{
    CoreResult, FlowError,
    flow::{AnswerAudio, Countdown, CountdownTick, Question, RecordingState, Session},
};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Events fed to the controller, in arrival order.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// One second elapsed. Drives both countdowns.
    Tick,
    /// The talent asked to stop the current recording.
    StopPressed,
    /// The talent asked to upload the parked answer and move on.
    AdvancePressed,
    /// The recorder finished a take and produced its payload.
    RecordingStopped(AnswerAudio),
    /// The recorder failed to start or to produce a payload.
    RecordingFailed(String),
    /// The in-flight upload succeeded.
    UploadSucceeded,
    /// The in-flight upload failed with a backend message.
    UploadFailed(String),
}

/// Side effects the driver must execute, in order.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Start capturing the active question's answer.
    StartRecording,
    /// Stop the recorder; it must answer with `RecordingStopped` or
    /// `RecordingFailed`.
    StopRecording,
    /// Submit one answer to the upload endpoint; it must answer with
    /// `UploadSucceeded` or `UploadFailed`.
    Upload(AnswerRequest),
    /// The question ended with nothing to submit.
    QuestionSkipped {
        /// The skipped question.
        question_id: String,
    },
    /// Surface a user-facing condition.
    Notify(Notice),
    /// The session is over; no further events will be acted on.
    SessionComplete(CompletionReason),
}

/// One answer submission. Session ids ride alongside via [`Session`].
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    /// The question being answered.
    pub question_id: String,
    /// The question text, echoed to the backend.
    pub question_prompt: String,
    /// The recorded answer payload.
    pub audio: AnswerAudio,
}

/// User-facing conditions surfaced by the flow. All are recoverable; the
/// talent may retry the blocking action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Advance was requested without a non-empty recorded answer. No
    /// network request was made.
    MissingAnswer,
    /// The upload endpoint rejected or failed the submission.
    UploadFailed {
        /// Backend-supplied failure message.
        message: String,
    },
    /// The recorder failed to start or finish a take.
    RecorderFailed {
        /// Recorder failure description.
        message: String,
    },
}

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// Every question was uploaded or skipped.
    AllQuestionsHandled,
    /// The exam countdown ran out.
    ExamTimeUp,
}

/// Sequences questions, manages both countdowns, drives the recording
/// lifecycle, and submits each answer before advancing.
///
/// Invariants:
/// - the active question index is monotonically non-decreasing and
///   bounded by the question count;
/// - advancing past question *i* only happens after its answer was
///   uploaded or explicitly skipped;
/// - at most one upload is in flight; stop/advance are ignored while the
///   busy flag is set.
#[derive(Debug)]
pub struct AuditionController {
    session: Session,
    index: usize,
    recording: RecordingState,
    exam_clock: Countdown,
    question_clock: Countdown,
    uploading: bool,
    stop_requested: bool,
    auto_submit: bool,
    started: bool,
    completed: Option<CompletionReason>,
}

impl AuditionController {
    /// Create a controller over `session` with a fixed exam time budget.
    pub fn new(session: Session, exam_limit: Duration) -> Self {
        let first_limit = session.questions()[0].time_limit;

        Self {
            session,
            index: 0,
            recording: RecordingState::Idle,
            exam_clock: Countdown::new(exam_limit),
            question_clock: Countdown::new(first_limit),
            uploading: false,
            stop_requested: false,
            auto_submit: false,
            started: false,
            completed: None,
        }
    }

    /// Begin the exam: starts the exam countdown and enters question 0.
    ///
    /// Recording is auto-started, never user-initiated.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::AlreadyStarted`] on a second call.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<Vec<Effect>> {
        if self.started {
            return Err(FlowError::AlreadyStarted {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.started = true;
        self.exam_clock.start();

        let mut effects = Vec::new();
        self.enter_question(&mut effects);

        info!(
            questions = self.session.question_count(),
            exam_secs = self.exam_clock.remaining_secs(),
            "Audition started"
        );

        Ok(effects)
    }

    /// Process one event and return the side effects to execute.
    ///
    /// Events arriving after completion are ignored.
    pub fn handle(&mut self, event: FlowEvent) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.completed.is_some() {
            debug!(?event, "Session complete, ignoring event");
            return effects;
        }

        match event {
            FlowEvent::Tick => self.on_tick(&mut effects),
            FlowEvent::StopPressed => self.on_stop_pressed(&mut effects),
            FlowEvent::AdvancePressed => self.on_advance_pressed(&mut effects),
            FlowEvent::RecordingStopped(audio) => self.on_recording_stopped(audio, &mut effects),
            FlowEvent::RecordingFailed(message) => self.on_recording_failed(message, &mut effects),
            FlowEvent::UploadSucceeded => self.on_upload_succeeded(&mut effects),
            FlowEvent::UploadFailed(message) => self.on_upload_failed(message, &mut effects),
        }

        effects
    }

    fn on_tick(&mut self, effects: &mut Vec<Effect>) {
        // The exam clock wins: its expiry ends the session regardless of
        // recording or upload state.
        if self.exam_clock.tick() == CountdownTick::Expired {
            info!("Exam time limit reached, ending session");
            self.complete(CompletionReason::ExamTimeUp, effects);
            return;
        }

        if self.question_clock.tick() == CountdownTick::Expired {
            self.on_question_timeout(effects);
        }
    }

    /// Question countdown expiry. Fires exactly once per question; the
    /// policy, in priority order: stop-and-submit a live take, submit a
    /// parked take, otherwise skip.
    fn on_question_timeout(&mut self, effects: &mut Vec<Effect>) {
        match &self.recording {
            RecordingState::Recording { .. } => {
                info!(
                    question_id = %self.current_question().id,
                    "Question time up while recording, stopping for auto-submit"
                );
                self.auto_submit = true;
                if !self.stop_requested {
                    self.stop_requested = true;
                    effects.push(Effect::StopRecording);
                }
            }
            RecordingState::Recorded { audio } if !self.uploading => {
                if audio.is_empty() {
                    self.skip_question(effects);
                } else {
                    info!(
                        question_id = %self.current_question().id,
                        "Question time up with a parked answer, submitting"
                    );
                    self.begin_upload(effects);
                }
            }
            RecordingState::Recorded { .. } => {
                // Upload already in flight; its result resolves the question.
            }
            RecordingState::Idle => {
                info!(
                    question_id = %self.current_question().id,
                    "Question time up with no recording, skipping"
                );
                self.skip_question(effects);
            }
        }
    }

    fn on_stop_pressed(&mut self, effects: &mut Vec<Effect>) {
        if self.uploading {
            debug!("Ignoring stop while an upload is in flight");
            return;
        }

        let RecordingState::Recording { started_at } = &self.recording else {
            debug!("Ignoring stop, nothing is recording");
            return;
        };
        let held_for_ms = started_at.elapsed().as_millis();

        if self.stop_requested {
            debug!("Stop already requested");
            return;
        }

        self.stop_requested = true;
        // A manual stop parks the take; it does not submit. The countdown
        // stops with it so the talent can review before advancing.
        self.question_clock.stop();
        effects.push(Effect::StopRecording);

        info!(
            question_id = %self.current_question().id,
            held_for_ms,
            "Recording stop requested"
        );
    }

    fn on_advance_pressed(&mut self, effects: &mut Vec<Effect>) {
        if self.uploading {
            debug!("Ignoring advance while an upload is in flight");
            return;
        }

        match &self.recording {
            RecordingState::Recorded { audio } if !audio.is_empty() => {
                self.begin_upload(effects);
            }
            RecordingState::Recorded { .. } => {
                warn!("Refusing to upload an empty answer");
                effects.push(Effect::Notify(Notice::MissingAnswer));
            }
            _ => {
                debug!("Advance requires a finished recording");
                effects.push(Effect::Notify(Notice::MissingAnswer));
            }
        }
    }

    fn on_recording_stopped(&mut self, audio: AnswerAudio, effects: &mut Vec<Effect>) {
        if !self.stop_requested {
            warn!("Recorder produced a payload without a stop request");
        }
        self.stop_requested = false;

        if let RecordingState::Recording { started_at } = &self.recording {
            info!(
                question_id = %self.current_question().id,
                duration_ms = started_at.elapsed().as_millis(),
                bytes = audio.len(),
                "Answer recorded"
            );
        }

        let empty = audio.is_empty();
        self.recording = RecordingState::Recorded { audio };

        if self.auto_submit {
            // Timeout-driven stop: submit without user interaction, or skip
            // when the take carries no audio.
            self.auto_submit = false;
            if empty {
                self.skip_question(effects);
            } else {
                self.begin_upload(effects);
            }
        }
    }

    fn on_recording_failed(&mut self, message: String, effects: &mut Vec<Effect>) {
        warn!(%message, "Recorder failed");
        effects.push(Effect::Notify(Notice::RecorderFailed { message }));

        let finishing = self.stop_requested;
        self.stop_requested = false;
        self.auto_submit = false;
        self.recording = RecordingState::Idle;

        if finishing {
            // The take was lost on stop: nothing to submit, so the question
            // is skipped rather than leaving the session stuck.
            self.skip_question(effects);
        }
        // A start failure leaves the question idle; the question countdown
        // will skip it.
    }

    fn on_upload_succeeded(&mut self, effects: &mut Vec<Effect>) {
        if !self.uploading {
            warn!("Upload result without an upload in flight");
            return;
        }
        self.uploading = false;

        info!(question_id = %self.current_question().id, "Answer uploaded");
        self.advance(effects);
    }

    fn on_upload_failed(&mut self, message: String, effects: &mut Vec<Effect>) {
        if !self.uploading {
            warn!("Upload result without an upload in flight");
            return;
        }
        self.uploading = false;

        warn!(
            %message,
            question_id = %self.current_question().id,
            "Answer upload failed, staying on question"
        );
        // The parked answer is kept; the talent may retry. There is no
        // automatic retry.
        effects.push(Effect::Notify(Notice::UploadFailed { message }));
    }

    fn begin_upload(&mut self, effects: &mut Vec<Effect>) {
        let RecordingState::Recorded { audio } = &self.recording else {
            return;
        };

        self.uploading = true;
        let question = &self.session.questions()[self.index];

        info!(
            question_id = %question.id,
            bytes = audio.len(),
            "Uploading answer"
        );

        effects.push(Effect::Upload(AnswerRequest {
            question_id: question.id.clone(),
            question_prompt: question.prompt.clone(),
            audio: audio.clone(),
        }));
    }

    fn skip_question(&mut self, effects: &mut Vec<Effect>) {
        effects.push(Effect::QuestionSkipped {
            question_id: self.current_question().id.clone(),
        });
        self.advance(effects);
    }

    fn advance(&mut self, effects: &mut Vec<Effect>) {
        if self.index + 1 < self.session.question_count() {
            self.index += 1;
            self.enter_question(effects);
        } else {
            self.complete(CompletionReason::AllQuestionsHandled, effects);
        }
    }

    fn enter_question(&mut self, effects: &mut Vec<Effect>) {
        let question = &self.session.questions()[self.index];

        info!(
            question_id = %question.id,
            index = self.index,
            limit_secs = question.time_limit.as_secs(),
            "Question active"
        );

        self.stop_requested = false;
        self.auto_submit = false;
        self.question_clock.reset(question.time_limit);
        self.question_clock.start();

        // Recording auto-starts on question entry.
        self.recording = RecordingState::Recording {
            started_at: Instant::now(),
        };
        effects.push(Effect::StartRecording);
    }

    fn complete(&mut self, reason: CompletionReason, effects: &mut Vec<Effect>) {
        self.question_clock.stop();
        self.exam_clock.stop();

        // Release the microphone if a take is still live; it is discarded.
        if self.recording.is_recording() && !self.stop_requested {
            effects.push(Effect::StopRecording);
        }
        self.recording = RecordingState::Idle;

        self.completed = Some(reason);
        effects.push(Effect::SessionComplete(reason));

        info!(?reason, "Session complete");
    }

    /// The session under audition.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 0-based index of the active question. Monotonically non-decreasing.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The active question.
    pub fn current_question(&self) -> &Question {
        &self.session.questions()[self.index]
    }

    /// Recording lifecycle of the active question.
    pub fn recording_state(&self) -> &RecordingState {
        &self.recording
    }

    /// Whether an upload is in flight. Stop/advance are ignored while set.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Why the session ended, once it has.
    pub fn completion(&self) -> Option<CompletionReason> {
        self.completed
    }

    /// Seconds left on the exam countdown.
    pub fn exam_remaining_secs(&self) -> u64 {
        self.exam_clock.remaining_secs()
    }

    /// Seconds left on the question countdown.
    pub fn question_remaining_secs(&self) -> u64 {
        self.question_clock.remaining_secs()
    }

    /// Whether the question countdown is in its final stretch.
    /// Presentation only.
    pub fn overtime(&self) -> bool {
        self.question_clock.in_final_stretch()
    }
}
