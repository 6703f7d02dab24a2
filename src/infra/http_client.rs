use crate::error::{FinderError, Result};
use crate::types::SourceKind;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Shared reqwest client with a bounded per-request timeout.
///
/// Every adapter goes through [`HttpClient::get_json`] so that transport
/// failures, non-success statuses, timeouts and unparseable bodies come back
/// as the same tagged errors regardless of provider.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FinderError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).header(ACCEPT, "application/json")
    }

    /// Send a prepared request and decode the JSON body.
    pub async fn get_json(&self, source_kind: SourceKind, request: RequestBuilder) -> Result<Value> {
        self.send_json(source_kind, request).await
    }

    /// Like [`get_json`](Self::get_json) but maps a 404 to `Ok(None)`.
    pub async fn get_json_optional(
        &self,
        source_kind: SourceKind,
        request: RequestBuilder,
    ) -> Result<Option<Value>> {
        match self.send_json(source_kind, request).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn send_json(&self, source_kind: SourceKind, request: RequestBuilder) -> Result<Value> {
        let request = request
            .build()
            .map_err(|e| classify(source_kind, "<unbuilt request>", e))?;
        let url = request.url().to_string();
        debug!(source = %source_kind, %url, "sending request");

        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| classify(source_kind, &url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FinderError::Network {
                source_kind,
                url,
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| classify(source_kind, &url, e))?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| FinderError::malformed(source_kind, format!("body of {} is not JSON: {}", url, e)))?;
        Ok(body)
    }
}

fn classify(source_kind: SourceKind, url: &str, err: reqwest::Error) -> FinderError {
    if err.is_timeout() {
        FinderError::Timeout {
            source_kind,
            url: url.to_string(),
        }
    } else {
        FinderError::Network {
            source_kind,
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
