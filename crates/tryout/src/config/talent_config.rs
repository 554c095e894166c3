use serde::{Deserialize, Serialize};

/// Identity of the acting talent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentConfig {
    /// Backend user id submitted with every answer (None until configured).
    #[serde(default)]
    pub user_id: Option<String>,
}
