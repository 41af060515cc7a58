//! Backend endpoint configuration parsed from environment variables.

pub const DEFAULT_BASE_URL: &str = "http://localhost:5555";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const QUERY_PATH: &str = "/query";
const UPLOAD_PATH: &str = "/upload";

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimeouts {
    pub connect_secs: u64,
    /// `None` lets a query run until the backend answers.
    pub request_secs: Option<u64>,
}

impl Default for ChatTimeouts {
    fn default() -> Self {
        Self { connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS, request_secs: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub base_url: String,
    pub timeouts: ChatTimeouts,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), timeouts: ChatTimeouts::default() }
    }
}

impl ChatConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_BASE_URL`: default `http://localhost:5555`
    /// - `CHAT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: no request timeout when absent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ChatConfig::from_env`] but reads through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup("CHAT_BASE_URL") {
            Some(raw) => normalize_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_owned(),
        };
        let connect_secs = parse_secs("CHAT_CONNECT_TIMEOUT_SECS", lookup("CHAT_CONNECT_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let request_secs = parse_secs("CHAT_REQUEST_TIMEOUT_SECS", lookup("CHAT_REQUEST_TIMEOUT_SECS"))?;

        Ok(Self { base_url, timeouts: ChatTimeouts { connect_secs, request_secs } })
    }

    /// Replace the base URL, validating and normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for non-HTTP URLs.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn query_url(&self) -> String {
        format!("{}{QUERY_PATH}", self.base_url)
    }

    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{}{UPLOAD_PATH}", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_secs(var: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
