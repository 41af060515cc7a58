//! Backend client for the question/answer and document upload endpoints.
//!
//! Thin HTTP wrapper over `POST /query` and `POST /upload`. Body parsing
//! lives in free functions so it can be tested without a server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Response { status: u16, message: String },

    /// The response body was not the expected JSON shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The caller dropped the exchange before the backend answered.
    #[error("query cancelled before the backend answered")]
    Cancelled,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

/// Successful answer from `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionRef>,
}

impl QueryResponse {
    #[must_use]
    pub fn answer(answer: impl Into<String>) -> Self {
        Self { answer: answer.into(), action: None }
    }

    #[must_use]
    pub fn with_action(mut self, action_key: impl Into<String>) -> Self {
        self.action = Some(ActionRef { action_key: action_key.into() });
        self
    }
}

/// Action suggestion attached to an answer. The key is resolved against the
/// static catalog by the conversation, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRef {
    pub action_key: String,
}

/// Successful answer from `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Async backend seam. Enables mocking the HTTP layer in tests.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask the backend a question.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status, or an
    /// unparseable body.
    async fn ask(&self, question: &str) -> Result<QueryResponse, ApiError>;

    /// Upload a document for the backend to index.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or rejection.
    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    query_url: String,
    upload_url: String,
}

impl HttpBackend {
    /// Build a client for the endpoints named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the reqwest client fails to build.
    pub fn new(config: &ChatConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, query_url: config.query_url(), upload_url: config.upload_url() })
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status().as_u16();
        let success = response.status().is_success();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !success {
            return Err(ApiError::Response { status, message: error_message(&text) });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpBackend {
    async fn ask(&self, question: &str) -> Result<QueryResponse, ApiError> {
        tracing::debug!(url = %self.query_url, "sending query");
        let response = self
            .http
            .post(&self.query_url)
            .json(&QueryRequest { question })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let text = Self::read_body(response).await?;
        parse_query_response(&text)
    }

    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError> {
        tracing::debug!(url = %self.upload_url, file_name, size = bytes.len(), "uploading document");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let text = Self::read_body(response).await?;
        parse_upload_response(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_query_response(json: &str) -> Result<QueryResponse, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

fn parse_upload_response(json: &str) -> Result<UploadResponse, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Prefer the backend's `{"error": ..}` text; fall back to the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_owned(),
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
