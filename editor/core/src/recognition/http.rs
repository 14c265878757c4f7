//! HTTP Recognition Client
//!
//! Talks to the billing backend's sale-processing endpoint.
//!
//! # Wire format
//!
//! - Request: `POST` with the raw UTF-8 line as the body.
//! - Response: JSON array of `{quantity, matched_item: {name, price},
//!   captured_name, confidence, status}`. The backend encodes an empty
//!   result as `null`, which is read as an empty array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::{RecognitionClient, RecognitionError};
use crate::config::ServiceConfig;
use crate::model::SaleLine;

/// Recognition client backed by the sale-processing HTTP endpoint
#[derive(Clone, Debug)]
pub struct HttpRecognitionClient {
    /// Full endpoint URL
    url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpRecognitionClient {
    /// Create a client for `url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`RecognitionError::Transport`] if the HTTP client cannot be
    /// constructed (e.g., TLS backend initialization failure).
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RecognitionError> {
        Ok(Self {
            url: url.into(),
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Create from the `[service]` configuration section
    ///
    /// # Errors
    ///
    /// See [`HttpRecognitionClient::new`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self, RecognitionError> {
        Self::new(config.url.clone(), config.timeout())
    }

    /// Endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decode a response body
    fn parse_response(body: &str) -> Result<Vec<SaleLine>, RecognitionError> {
        let lines: Option<Vec<SaleLine>> = serde_json::from_str(body)?;
        Ok(lines.unwrap_or_default())
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<SaleLine>, RecognitionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RecognitionError::EmptyInput);
        }

        tracing::debug!(url = %self.url, text, "Sending recognition request");

        let response = self
            .http_client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let lines = Self::parse_response(&body)?;

        tracing::debug!(lines = lines.len(), "Recognition response decoded");
        Ok(lines)
    }

    async fn health_check(&self) -> bool {
        // The endpoint answers pre-flight requests without running the matcher
        self.http_client
            .request(reqwest::Method::OPTIONS, &self.url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}
