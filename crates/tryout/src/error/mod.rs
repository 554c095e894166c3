use tryout_core::FlowError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the tryout binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Flow or capture error from tryout-core.
    #[error("Audition error: {source} {location}")]
    Flow {
        /// The underlying flow error.
        #[source]
        source: FlowError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A backend request could not be sent or its body could not be read.
    #[error("Backend request failed ({endpoint}): {source} {location}")]
    Backend {
        /// Endpoint path the request targeted.
        endpoint: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The backend answered with a non-success response.
    #[error("Backend rejected request ({endpoint}): {message} {location}")]
    Rejected {
        /// Endpoint path the request targeted.
        endpoint: String,
        /// Backend-supplied failure message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The talent already submitted an audition for this opportunity.
    #[error("Already auditioned for opportunity {opportunity_id} {location}")]
    AlreadyApplied {
        /// The opportunity a submission already exists for.
        opportunity_id: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// No opportunity with the requested id exists.
    #[error("Opportunity not found: {opportunity_id} {location}")]
    OpportunityNotFound {
        /// The opportunity id that was looked up.
        opportunity_id: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The audition was aborted from the terminal before completion.
    #[error("Audition aborted {location}")]
    Aborted {
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading, saving or validation error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<FlowError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<FlowError> for AppError {
    #[track_caller]
    fn from(source: FlowError) -> Self {
        AppError::Flow {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
