//! Transport - HTTP round trips for the LLM client
//!
//! The client never talks to `reqwest` directly; it goes through the
//! [`Transport`] trait so that the retry and normalization logic can be
//! exercised against [`MockTransport`].

mod mock;

pub use mock::MockTransport;

use crate::error::{Error, Result};
use crate::providers::PreparedRequest;
use crate::util::{redact_error_body, truncate_safe};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Maximum characters of an error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Trait for HTTP transports
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// POST the request's JSON payload and return the JSON response body.
    ///
    /// Non-2xx statuses must be reported as [`Error::Api`].
    async fn post_json(&self, request: &PreparedRequest) -> Result<Value>;

    /// GET a JSON document
    async fn get_json(&self, url: &str, headers: &[(String, String)]) -> Result<Value>;
}

/// `reqwest`-backed transport with a fixed per-request timeout
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new transport
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout.as_millis() as u64)
        } else if e.is_connect() {
            Error::Network(format!("failed to connect: {}", e))
        } else {
            Error::Network(e.to_string())
        }
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            // SECURITY: Don't expose raw HTTP response body
            return Err(Error::Api {
                status: status.as_u16(),
                message: redact_error_body(truncate_safe(&body, MAX_ERROR_BODY_CHARS)),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::InvalidResponse(format!(
                "{}: {}",
                e,
                truncate_safe(&body, MAX_ERROR_BODY_CHARS)
            ))
        })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn post_json(&self, request: &PreparedRequest) -> Result<Value> {
        debug!("Sending inference request");

        let mut builder = self.client.post(&request.url).json(&request.payload);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        self.read_json(response).await
    }

    #[instrument(skip(self, headers))]
    async fn get_json(&self, url: &str, headers: &[(String, String)]) -> Result<Value> {
        let mut builder = self
            .client
            .get(url)
            .header("accept", "application/json");
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        self.read_json(response).await
    }
}
