use crate::config::default_base_url;

use serde::{Deserialize, Serialize};

/// Talent backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the talent backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}
