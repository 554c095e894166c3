use crate::config::{default_exam_time_limit_secs, default_fallback_question_secs};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Audition session timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Total exam budget in seconds. Starts once and never resets.
    #[serde(default = "default_exam_time_limit_secs")]
    pub exam_time_limit_secs: u64,

    /// Question time limit used when the backend omits one.
    #[serde(default = "default_fallback_question_secs")]
    pub fallback_question_secs: u64,
}

impl SessionConfig {
    /// The exam budget as a duration.
    pub fn exam_time_limit(&self) -> Duration {
        Duration::from_secs(self.exam_time_limit_secs)
    }
}
