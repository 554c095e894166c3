mod audio_config;
mod backend_config;
#[allow(clippy::module_inception)]
mod config;
mod session_config;
mod talent_config;

pub(crate) use {
    audio_config::AudioConfig, backend_config::BackendConfig, config::Config,
    session_config::SessionConfig, talent_config::TalentConfig,
};

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub(crate) const DEFAULT_EXAM_TIME_LIMIT_SECS: u64 = 1800;
pub(crate) const DEFAULT_FALLBACK_QUESTION_SECS: u64 = 90;

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_exam_time_limit_secs() -> u64 {
    DEFAULT_EXAM_TIME_LIMIT_SECS
}

pub(crate) fn default_fallback_question_secs() -> u64 {
    DEFAULT_FALLBACK_QUESTION_SECS
}
