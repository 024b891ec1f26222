//! Environment-based configuration.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::bgg::client::DEFAULT_API_URL;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    /// BGG username whose collection is reconciled.
    pub bgg_username: String,
    /// API base URL; overridable for self-hosted mirrors and tests.
    pub bgg_api_url: String,
    /// Optional bearer token attached to every API request.
    pub bgg_api_token: Option<String>,
    /// Fixed wait between poll attempts while BGG reports "processing".
    pub retry_wait: Duration,
    /// Total attempt budget per request, including the first try.
    pub retry_max_attempts: u32,
    pub game_ignore_file_path: Option<PathBuf>,
    pub expansion_ignore_file_path: Option<PathBuf>,
    /// Email delivery settings; `None` disables the digest email.
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Recipient address; defaults to the SMTP username.
    pub to: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let retry_max_attempts: u32 = parse_var("RETRY_MAX_ATTEMPTS", 10)?;
        if retry_max_attempts == 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "RETRY_MAX_ATTEMPTS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let smtp = match optional_var("SMTP_HOST") {
            Some(host) => {
                let username = require_var("SMTP_USERNAME")?;
                Some(SmtpConfig {
                    host,
                    port: parse_var("SMTP_PORT", 465)?,
                    password: require_var("SMTP_PASSWORD")?,
                    to: optional_var("EMAIL_TO").unwrap_or_else(|| username.clone()),
                    username,
                })
            }
            None => None,
        };

        Ok(Self {
            bgg_username: require_var("BGG_USERNAME")?,
            bgg_api_url: optional_var("BGG_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            bgg_api_token: optional_var("BGG_API_TOKEN"),
            retry_wait: Duration::from_secs(parse_var("RETRY_WAIT_SECONDS", 5u64)?),
            retry_max_attempts,
            game_ignore_file_path: optional_var("GAME_IGNORE_FILE_PATH").map(PathBuf::from),
            expansion_ignore_file_path: optional_var("EXPANSION_IGNORE_FILE_PATH")
                .map(PathBuf::from),
            smtp,
        })
    }
}

fn require_var(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

/// Unset and empty variables are both treated as absent.
fn optional_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

fn parse_var<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional_var(var) {
        Some(raw) => raw.parse().map_err(|err: T::Err| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: err.to_string(),
        }),
        None => Ok(default),
    }
}
