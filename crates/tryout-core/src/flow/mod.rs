mod controller;
mod countdown;
mod question;
mod recording;

pub use {
    controller::{AnswerRequest, AuditionController, CompletionReason, Effect, FlowEvent, Notice},
    countdown::{Countdown, CountdownTick, OVERTIME_WARNING_SECS},
    question::{Question, Session},
    recording::{AnswerAudio, RecordingState},
};
