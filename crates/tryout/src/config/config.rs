//! Configuration management for tryout.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, lazy validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, BackendConfig, SessionConfig, TalentConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use crate::config::{
    DEFAULT_EXAM_TIME_LIMIT_SECS, DEFAULT_FALLBACK_QUESTION_SECS, default_base_url,
};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Talent backend configuration.
    pub backend: BackendConfig,
    /// Identity of the acting talent.
    pub talent: TalentConfig,
    /// Audio device configuration.
    pub audio: AudioConfig,
    /// Session timing configuration.
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Note: This does NOT validate the talent identity. Call
    /// `require_user_id()` before starting a real audition. Listing
    /// opportunities and running the demo work without one.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Validate that a talent user id has been configured.
    ///
    /// Called lazily before a real audition, not at load time, so the
    /// listing and demo commands work on a fresh install.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn require_user_id(&self) -> AppResult<&str> {
        match self.talent.user_id.as_deref() {
            Some(user_id) if !user_id.trim().is_empty() => Ok(user_id),
            _ => Err(AppError::ConfigError {
                reason: format!(
                    "No talent user id configured. Set [talent] user_id in {:?}.",
                    Self::config_path().map(|p| p.display().to_string()).unwrap_or_default()
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tryout", "Tryout").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config {
            backend: BackendConfig {
                base_url: default_base_url(),
            },
            talent: TalentConfig { user_id: None },
            audio: AudioConfig {
                selected_device: None,
            },
            session: SessionConfig {
                exam_time_limit_secs: DEFAULT_EXAM_TIME_LIMIT_SECS,
                fallback_question_secs: DEFAULT_FALLBACK_QUESTION_SECS,
            },
        };

        config.save()?;

        warn!("Default config created. A talent user id must be configured before auditioning.");

        Ok(config)
    }
}
