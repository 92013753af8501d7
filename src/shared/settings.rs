use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;
use tracing::{debug, info};

use crate::shared::error::{AppError, AppResult};

/// Overrides `api.base_url` when set
pub const API_URL_ENV: &str = "TRANSLATOR_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// No timeout unless set; the transport default applies
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub success_pulse_ms: u64,
    pub export_dir: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: None,
            user_agent: format!("translator-orchestrator/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            success_pulse_ms: 3000,
            export_dir: None,
        }
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "translator-orchestrator")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    /// Load from the platform config dir, writing defaults on first run
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> AppResult<Self> {
        let mut settings = if !path.exists() {
            info!(path = %path.display(), "Settings file missing, writing defaults");
            let settings = Self::default();
            settings.save_to(path).await?;
            settings
        } else {
            let content = fs::read_to_string(path).await
                .map_err(|e| AppError::Config(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?
        };

        settings.apply_env_overrides();
        debug!(base_url = %settings.api.base_url, "Settings loaded");
        Ok(settings)
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize settings: {}", e)))?;

        fs::write(path, content).await
            .map_err(|e| AppError::Config(format!("Failed to write settings file: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    pub fn success_pulse(&self) -> Duration {
        Duration::from_millis(self.preferences.success_pulse_ms)
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
