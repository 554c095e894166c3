use error_location::ErrorLocation;
use thiserror::Error;

/// Audition flow and capture errors with source location tracking.
#[derive(Error, Debug)]
pub enum FlowError {
    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio data captured for the answer.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Encoding captured samples into a WAV payload failed.
    #[error("Audio encoding error: {reason} {location}")]
    EncodingError {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session was built with no questions.
    #[error("Audition session has no questions {location}")]
    NoQuestions {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// `start()` was called on a controller that already started.
    #[error("Audition already started {location}")]
    AlreadyStarted {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`FlowError`].
pub type Result<T> = std::result::Result<T, FlowError>;
