//! Site configuration domain models.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Configuration loaded from `onair.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Backend API configuration.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Live audio stream configuration.
    #[serde(default)]
    pub stream: StreamConfig,
    /// Presenter dashboard configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Form behaviour configuration.
    #[serde(default)]
    pub forms: FormsConfig,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.backend.validate()?;
        self.stream.validate()?;
        self.dashboard.validate()?;
        Ok(())
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL every `/api/...` path is resolved against.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { api_url: default_api_url(), timeout_secs: default_timeout() }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(AppError::InvalidConfig(format!(
                "api_url must use http or https, got '{}'",
                self.api_url.scheme()
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> Url {
    Url::parse("http://localhost:8000").expect("Default API URL must be valid")
}

fn default_timeout() -> u64 {
    30
}

/// Live audio stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Audio stream URL played by Listen Live.
    #[serde(default = "default_stream_url")]
    pub url: Url,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { url: default_stream_url() }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(AppError::InvalidConfig(format!(
                "stream url must use http or https, got '{}'",
                self.url.scheme()
            )));
        }
        Ok(())
    }
}

fn default_stream_url() -> Url {
    Url::parse("https://stream.example.com/live").expect("Default stream URL must be valid")
}

/// Presenter dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Weather refresh interval in seconds.
    #[serde(default = "default_weather_refresh_secs")]
    pub weather_refresh_secs: u64,
    /// Directory backing the local entry cache.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            weather_refresh_secs: default_weather_refresh_secs(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.weather_refresh_secs == 0 {
            return Err(AppError::InvalidConfig(
                "weather_refresh_secs must be greater than 0".to_string(),
            ));
        }
        if self.storage_dir.as_os_str().is_empty() {
            return Err(AppError::InvalidConfig("storage_dir must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn weather_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.weather_refresh_secs)
    }
}

fn default_weather_refresh_secs() -> u64 {
    15 * 60
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".onair")
}

/// Form behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormsConfig {
    /// Delay before the contact popup closes after a successful submission.
    #[serde(default = "default_contact_auto_close_ms")]
    pub contact_auto_close_ms: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self { contact_auto_close_ms: default_contact_auto_close_ms() }
    }
}

impl FormsConfig {
    pub fn contact_auto_close(&self) -> Duration {
        Duration::from_millis(self.contact_auto_close_ms)
    }
}

fn default_contact_auto_close_ms() -> u64 {
    2000
}
