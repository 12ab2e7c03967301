use crate::utils::error::Result;
use reqwest::{header, Client, Method};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Raw outcome of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportResponse {
    pub status: u16,
    pub response: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// JSON-over-HTTPS helper shared by every gateway call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub async fn make_request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        bearer: &str,
    ) -> Result<TransportResponse> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .timeout(self.timeout);

        request = match body {
            Some(body) => request.body(body),
            None => request.header(header::CONTENT_LENGTH, "0"),
        };

        tracing::debug!("📡 {} {}", method, url);
        let response = request.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("📡 Gateway response status: {}", status);

        let response = response.text().await?;

        Ok(TransportResponse { status, response })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECONDS)
    }
}
