//! Site configuration loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use url::Url;

use crate::domain::{AppError, SiteConfig};

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "onair.toml";
/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ONAIR_CONFIG";
/// Environment variable overriding `backend.api_url`.
pub const API_URL_ENV: &str = "ONAIR_API_URL";
/// Environment variable overriding `stream.url`.
pub const STREAM_URL_ENV: &str = "ONAIR_STREAM_URL";

/// Load the site configuration.
///
/// An explicit path (argument or `ONAIR_CONFIG`) must exist. The implicit
/// `onair.toml` is optional and falls back to defaults. Environment overrides
/// are applied last, then the result is validated.
pub fn load_config(explicit: Option<&Path>) -> Result<SiteConfig, AppError> {
    let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let requested = explicit.map(Path::to_path_buf).or(env_path);

    let mut config = match requested {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    AppError::ConfigMissing(path.display().to_string())
                } else {
                    AppError::Io(err)
                }
            })?;
            toml::from_str(&content)?
        }
        None => match fs::read_to_string(CONFIG_FILE) {
            Ok(content) => toml::from_str(&content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => SiteConfig::default(),
            Err(err) => return Err(err.into()),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<SiteConfig, AppError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Apply deploy-time URL overrides on top of file values.
pub fn apply_env_overrides<F>(config: &mut SiteConfig, lookup: F) -> Result<(), AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.backend.api_url = parse_url(API_URL_ENV, &raw)?;
    }
    if let Some(raw) = lookup(STREAM_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.stream.url = parse_url(STREAM_URL_ENV, &raw)?;
    }
    Ok(())
}

fn parse_url(what: &str, raw: &str) -> Result<Url, AppError> {
    Url::parse(raw.trim())
        .map_err(|e| AppError::Parse { what: what.to_string(), details: e.to_string() })
}
