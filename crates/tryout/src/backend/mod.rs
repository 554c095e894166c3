mod client;
mod types;

pub(crate) use {
    client::BackendClient,
    types::{AuditionStart, Opportunity, SubmissionSummary, WireQuestion, normalize_questions},
};

#[cfg(test)]
pub(crate) use types::MaybeWrapped;
