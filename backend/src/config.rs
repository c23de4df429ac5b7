use std::{env, path::PathBuf, time::Duration};

use crate::{error::AppError, models::session::Theme};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_dir: PathBuf,
    pub tree_source: Option<String>,
    pub fetch_timeout: Duration,
    pub max_upload_bytes: usize,
    pub max_sessions: usize,
    pub default_theme: Theme,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid SERVER_PORT: {err}")))?;

        let log_dir =
            PathBuf::from(lookup("DATAHUB_LOG_DIR").unwrap_or_else(|| "./log".into()));

        let tree_source = lookup("DATAHUB_TREE_SOURCE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let fetch_timeout_secs: u64 = lookup("DATAHUB_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".into())
            .parse()
            .map_err(|err| {
                AppError::Config(format!("invalid DATAHUB_FETCH_TIMEOUT_SECS: {err}"))
            })?;

        let max_upload_bytes: usize = lookup("DATAHUB_MAX_UPLOAD_BYTES")
            .unwrap_or_else(|| "5242880".into())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid DATAHUB_MAX_UPLOAD_BYTES: {err}")))?;

        let max_sessions: usize = lookup("DATAHUB_MAX_SESSIONS")
            .unwrap_or_else(|| "1024".into())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid DATAHUB_MAX_SESSIONS: {err}")))?;
        if max_sessions == 0 {
            return Err(AppError::Config(
                "DATAHUB_MAX_SESSIONS must be at least 1".into(),
            ));
        }

        let default_theme = lookup("DATAHUB_DEFAULT_THEME")
            .unwrap_or_else(|| "light".into())
            .parse::<Theme>()
            .map_err(|err| AppError::Config(format!("invalid DATAHUB_DEFAULT_THEME: {err}")))?;

        Ok(Self {
            host,
            port,
            log_dir,
            tree_source,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_upload_bytes,
            max_sessions,
            default_theme,
        })
    }
}
