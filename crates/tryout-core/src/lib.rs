//! Tryout Core Library
//!
//! Flow control for timed audio auditions: an explicit state machine that
//! sequences one question at a time through record, stop, upload, advance,
//! under an exam-wide countdown and a per-question countdown. The controller
//! is pure: it consumes [`FlowEvent`]s and emits [`Effect`]s, and the driver
//! executes them against a [`Recorder`] and an upload endpoint.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use tryout_core::{
//!     AuditionController, CoreResult, Effect, FlowEvent, Question, Session,
//! };
//!
//! fn main() -> CoreResult<()> {
//!     let session = Session::new(
//!         "talent-1".into(),
//!         "opp-1".into(),
//!         None,
//!         vec![Question {
//!             id: "q1".into(),
//!             prompt: "Tell us about yourself.".into(),
//!             time_limit: Duration::from_secs(90),
//!         }],
//!     )?;
//!
//!     let mut controller = AuditionController::new(session, Duration::from_secs(1800));
//!     let effects = controller.start()?;
//!     assert!(matches!(effects.as_slice(), [Effect::StartRecording]));
//!
//!     // One event per second keeps both countdowns moving.
//!     let _effects = controller.handle(FlowEvent::Tick);
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod flow;

pub use {
    audio::{MicRecorder, Recorder},
    error::{FlowError, Result as CoreResult},
    flow::{
        AnswerAudio, AnswerRequest, AuditionController, CompletionReason, Countdown,
        CountdownTick, Effect, FlowEvent, Notice, OVERTIME_WARNING_SECS, Question,
        RecordingState, Session,
    },
};

#[cfg(test)]
mod tests;
