use crate::{CoreResult, FlowError};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;

/// A single interview question with its recording time budget.
///
/// Immutable once loaded; supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Backend identifier for the question.
    pub id: String,
    /// The question text shown (and read) to the talent.
    pub prompt: String,
    /// How long the talent has to record an answer.
    pub time_limit: Duration,
}

/// An ordered audition session for one talent/opportunity pair.
///
/// The optional submission id correlates all answers server-side.
#[derive(Debug, Clone)]
pub struct Session {
    /// The talent recording the audition.
    pub user_id: String,
    /// The opportunity being auditioned for.
    pub opportunity_id: String,
    /// Submission id issued by the backend at session start, if any.
    pub submission_id: Option<String>,
    questions: Vec<Question>,
}

impl Session {
    /// Build a session over an ordered, non-empty question list.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NoQuestions`] when `questions` is empty.
    #[track_caller]
    pub fn new(
        user_id: String,
        opportunity_id: String,
        submission_id: Option<String>,
        questions: Vec<Question>,
    ) -> CoreResult<Self> {
        if questions.is_empty() {
            return Err(FlowError::NoQuestions {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            user_id,
            opportunity_id,
            submission_id,
            questions,
        })
    }

    /// The ordered question list.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in the session. Always at least one.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Sum of all question time limits.
    pub fn total_duration(&self) -> Duration {
        self.questions.iter().map(|q| q.time_limit).sum()
    }
}
