//! Relay server configuration, loaded from `SECSEND_*` environment
//! variables the way the original `secsend_api` reads its Sanic
//! `env_prefix="SECSEND_"` config.

use std::env;

/// Relay server configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address to bind the HTTP listener to
    pub bind_addr: String,
    /// Storage root for the object store (`SECSEND_BACKEND_FILES_ROOT`)
    pub backend_files_root: String,
    /// Accepted `timeout_s` values (`SECSEND_TIMEOUT_S_VALID`, comma-separated)
    pub timeout_s_valid: Vec<u64>,
    /// Maximum upload size in bytes, `0` meaning unlimited (`SECSEND_FILESIZE_LIMIT`)
    pub filesize_limit: u64,
    /// Optional static webapp root (`SECSEND_HTML_ROOT`). Accepted for
    /// wire-compatibility with the original env contract; static asset
    /// serving is out of scope here, so this is parsed and logged but
    /// otherwise unused.
    pub html_root: Option<String>,
}

/// Errors loading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `SECSEND_TIMEOUT_S_VALID` didn't parse as a comma-separated list of
    /// non-negative integers
    #[error("invalid SECSEND_TIMEOUT_S_VALID value: {0}")]
    InvalidTimeoutList(String),
    /// `SECSEND_FILESIZE_LIMIT` wasn't a valid non-negative integer
    #[error("invalid SECSEND_FILESIZE_LIMIT value: {0}")]
    InvalidFilesizeLimit(String),
}

impl RelayConfig {
    /// Load configuration from the process environment, matching
    /// `app.py`'s defaults where the original leaves a setting unset:
    /// `timeout_s_valid` defaults to `[0]`, `filesize_limit` to unlimited.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("SECSEND_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let backend_files_root = env::var("SECSEND_BACKEND_FILES_ROOT").unwrap_or_else(|_| {
            let default = "secsend_root".to_string();
            tracing::warn!(
                "no SECSEND_BACKEND_FILES_ROOT specified, using the path '{}'",
                default
            );
            default
        });

        let timeout_s_valid = match env::var("SECSEND_TIMEOUT_S_VALID") {
            Ok(raw) => parse_timeout_list(&raw)?,
            Err(_) => vec![0],
        };

        let filesize_limit = match env::var("SECSEND_FILESIZE_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidFilesizeLimit(raw))?,
            Err(_) => 0,
        };

        let html_root = env::var("SECSEND_HTML_ROOT").ok();

        Ok(Self {
            bind_addr,
            backend_files_root,
            timeout_s_valid,
            filesize_limit,
            html_root,
        })
    }

    /// Whether `timeout_s` is one of the accepted values
    pub fn accepts_timeout(&self, timeout_s: u64) -> bool {
        self.timeout_s_valid.contains(&timeout_s)
    }
}

fn parse_timeout_list(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeoutList(raw.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_timeouts() {
        assert_eq!(parse_timeout_list("0,60,3600").unwrap(), vec![0, 60, 3600]);
    }

    #[test]
    fn rejects_negative_timeout() {
        assert!(parse_timeout_list("0,-5").is_err());
    }

    #[test]
    fn rejects_garbage_timeout() {
        assert!(parse_timeout_list("zero").is_err());
    }
}
