//! Wire types for the talent backend.
//!
//! The transport format is an external contract; these types only decode
//! it. Questions arrive in two historical shapes (`text`/`duration` and
//! `question_text`/`time_limit_seconds`), so normalization accepts both.

use std::time::Duration;

use serde::Deserialize;
use tryout_core::Question;

/// A question as delivered by the backend, in either shape.
#[derive(Debug, Clone, Deserialize)]
pub struct WireQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    question_text: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    time_limit_seconds: Option<u64>,
    #[serde(default)]
    duration: Option<u64>,
}

impl WireQuestion {
    /// Normalize into a flow [`Question`].
    ///
    /// `position` is the 0-based position in the list, used to synthesize
    /// an id when the backend omits one; `fallback_secs` fills a missing
    /// time limit.
    pub fn into_question(self, position: usize, fallback_secs: u64) -> Question {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("q{}", position + 1));

        let prompt = self
            .question_text
            .or(self.prompt)
            .or(self.text)
            .unwrap_or_default();

        let secs = self
            .time_limit_seconds
            .or(self.duration)
            .unwrap_or(fallback_secs);

        Question {
            id,
            prompt,
            time_limit: Duration::from_secs(secs),
        }
    }
}

/// Normalize a wire question list into flow questions.
pub(crate) fn normalize_questions(wire: Vec<WireQuestion>, fallback_secs: u64) -> Vec<Question> {
    wire.into_iter()
        .enumerate()
        .map(|(position, q)| q.into_question(position, fallback_secs))
        .collect()
}

/// An opportunity a talent can audition for.
#[derive(Debug, Clone, Deserialize)]
pub struct Opportunity {
    /// Backend identifier.
    pub id: String,
    /// Role title.
    pub title: String,
    /// Hiring company.
    pub company: String,
    /// Work location.
    #[serde(default)]
    pub location: String,
    /// Engagement type (contract, full-time, ...).
    #[serde(default, rename = "type")]
    pub employment_type: String,
    /// Advertised rate.
    #[serde(default)]
    pub rate: String,
    /// Skills the role asks for.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Questions embedded in the listing.
    #[serde(default)]
    pub questions: Vec<WireQuestion>,
}

/// A talent's persisted submission, as shown on the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionSummary {
    /// Submission identifier.
    pub id: String,
    /// Role title of the audition.
    #[serde(default)]
    pub title: String,
    /// Hiring company.
    #[serde(default)]
    pub company: String,
    /// Review status, snake_cased by the backend.
    #[serde(default)]
    pub status: String,
    /// ISO timestamp of the submission.
    #[serde(default, rename = "submittedAt")]
    pub submitted_at: Option<String>,
    /// Opportunity the submission belongs to. Accepts both spellings the
    /// backend has used.
    #[serde(default, rename = "opportunityId", alias = "opportunity_id")]
    pub opportunity_id: Option<String>,
}

impl SubmissionSummary {
    /// Human form of the review status: `under_review` -> `Under Review`.
    pub fn status_label(&self) -> String {
        self.status
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Response of `POST /api/audition/start`.
#[derive(Debug, Deserialize)]
pub struct AuditionStart {
    /// Submission id correlating all answers of this attempt.
    #[serde(default, rename = "submissionId")]
    pub submission_id: Option<String>,
    /// The ordered question list for the audition.
    #[serde(default)]
    pub questions: Vec<WireQuestion>,
}

/// Response of `GET /api/audition/demo`.
#[derive(Debug, Deserialize)]
pub(crate) struct DemoQuestions {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub questions: Vec<WireQuestion>,
}

/// Message envelope used by error responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /api/audition/create-submission`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateSubmissionResponse {
    pub data: CreateSubmissionData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSubmissionData {
    #[serde(rename = "submissionId")]
    pub submission_id: String,
}

/// The submissions endpoint answers either a bare array or `{data: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MaybeWrapped<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> MaybeWrapped<T> {
    pub fn into_inner(self) -> Vec<T> {
        match self {
            MaybeWrapped::Wrapped { data } => data,
            MaybeWrapped::Bare(items) => items,
        }
    }
}
