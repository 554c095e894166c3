//! REST client for the talent backend.
//!
//! One thin method per endpoint; the backend itself (persistence,
//! authentication, review) is an external collaborator.

use crate::{
    AppError, AppResult,
    backend::{
        AuditionStart, Opportunity, SubmissionSummary, WireQuestion,
        types::{ApiMessage, CreateSubmissionResponse, DemoQuestions, MaybeWrapped},
    },
    config::BackendConfig,
};

use std::panic::Location;

use error_location::ErrorLocation;
use reqwest::multipart;
use serde_json::json;
use tracing::{debug, info, instrument};
use tryout_core::{AnswerRequest, Session};

/// HTTP client for the audition and opportunity endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client against the configured backend.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// All opportunities currently open for auditions.
    #[instrument(skip(self))]
    pub async fn opportunities(&self) -> AppResult<Vec<Opportunity>> {
        let endpoint = "/api/opportunities";

        let response = self
            .http
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let response = Self::check(endpoint, response).await?;

        let opportunities: Vec<Opportunity> = response
            .json()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        debug!(count = opportunities.len(), "Opportunities fetched");

        Ok(opportunities)
    }

    /// A single opportunity by id.
    ///
    /// The backend has no detail endpoint; the listing is fetched and
    /// searched, matching how the original landing page resolved ids.
    #[track_caller]
    #[instrument(skip(self))]
    pub async fn opportunity(&self, opportunity_id: &str) -> AppResult<Opportunity> {
        let opportunities = self.opportunities().await?;

        opportunities
            .into_iter()
            .find(|o| o.id == opportunity_id)
            .ok_or_else(|| AppError::OpportunityNotFound {
                opportunity_id: opportunity_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// The talent's persisted submissions.
    #[instrument(skip(self))]
    pub async fn submissions(&self, user_id: &str) -> AppResult<Vec<SubmissionSummary>> {
        let endpoint = "/api/submissions";

        let response = self
            .http
            .get(self.url(endpoint))
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let response = Self::check(endpoint, response).await?;

        let wrapped: MaybeWrapped<SubmissionSummary> = response
            .json()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let submissions = wrapped.into_inner();
        debug!(count = submissions.len(), "Submissions fetched");

        Ok(submissions)
    }

    /// Open an audition attempt: returns the submission id and question
    /// list for a user/opportunity pair.
    #[instrument(skip(self))]
    pub async fn start_audition(
        &self,
        user_id: &str,
        opportunity_id: &str,
    ) -> AppResult<AuditionStart> {
        let endpoint = "/api/audition/start";

        let response = self
            .http
            .post(self.url(endpoint))
            .json(&json!({
                "userId": user_id,
                "opportunityId": opportunity_id,
            }))
            .send()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let response = Self::check(endpoint, response).await?;

        let start: AuditionStart = response
            .json()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        info!(
            submission_id = ?start.submission_id,
            questions = start.questions.len(),
            "Audition started"
        );

        Ok(start)
    }

    /// The fixed practice question set.
    #[track_caller]
    #[instrument(skip(self))]
    pub async fn demo_questions(&self) -> AppResult<Vec<WireQuestion>> {
        let endpoint = "/api/audition/demo";

        let response = self
            .http
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let response = Self::check(endpoint, response).await?;

        let demo: DemoQuestions = response
            .json()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        if !demo.success {
            return Err(AppError::Rejected {
                endpoint: endpoint.to_string(),
                message: demo
                    .message
                    .unwrap_or_else(|| "Failed to load demo questions".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(demo.questions)
    }

    /// Upload one recorded answer as a multipart form.
    ///
    /// One request per answer; the optional submission id correlates them
    /// server-side.
    #[instrument(skip(self, session, answer), fields(question_id = %answer.question_id))]
    pub async fn submit_answer(&self, session: &Session, answer: &AnswerRequest) -> AppResult<()> {
        let endpoint = "/api/audition/submit-answer";

        let part = multipart::Part::bytes(answer.audio.bytes().to_vec())
            .file_name(answer.audio.file_name().to_string())
            .mime_str(answer.audio.mime_type())
            .map_err(|e| Self::transport(endpoint, e))?;

        let mut form = multipart::Form::new()
            .part("audio_file", part)
            .text("userId", session.user_id.clone())
            .text("opportunityId", session.opportunity_id.clone())
            .text("questionId", answer.question_id.clone())
            .text("questionText", answer.question_prompt.clone());

        if let Some(submission_id) = &session.submission_id {
            form = form.text("submissionId", submission_id.clone());
        }

        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let _ = Self::check(endpoint, response).await?;

        info!(
            question_id = %answer.question_id,
            bytes = answer.audio.len(),
            "Answer uploaded"
        );

        Ok(())
    }

    /// Record the finished audition so it appears in "My Applications".
    #[instrument(skip(self, session))]
    pub async fn create_submission(&self, session: &Session) -> AppResult<String> {
        let endpoint = "/api/audition/create-submission";

        let questions: Vec<_> = session
            .questions()
            .iter()
            .map(|q| {
                json!({
                    "question_text": q.prompt,
                    "time_limit_seconds": q.time_limit.as_secs(),
                })
            })
            .collect();

        let response = self
            .http
            .post(self.url(endpoint))
            .json(&json!({
                "userId": session.user_id,
                "opportunityId": session.opportunity_id,
                "questions": questions,
                "totalDuration": session.total_duration().as_secs(),
            }))
            .send()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        let response = Self::check(endpoint, response).await?;

        let created: CreateSubmissionResponse = response
            .json()
            .await
            .map_err(|e| Self::transport(endpoint, e))?;

        info!(
            submission_id = %created.data.submission_id,
            "Submission recorded"
        );

        Ok(created.data.submission_id)
    }

    /// Map a non-success response to a `Rejected` error carrying the
    /// backend's message, when it sent one.
    #[track_caller]
    async fn check(endpoint: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = response
            .json::<ApiMessage>()
            .await
            .ok()
            .and_then(|m| m.message)
            .unwrap_or_else(|| format!("HTTP {}", status));

        Err(AppError::Rejected {
            endpoint: endpoint.to_string(),
            message,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn transport(endpoint: &str, source: reqwest::Error) -> AppError {
        AppError::Backend {
            endpoint: endpoint.to_string(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
