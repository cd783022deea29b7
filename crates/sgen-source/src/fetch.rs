//! # URL Fetch
//!
//! One GET per URL, bounded by a client timeout and a body-size cap. Only
//! `http` and `https` are accepted. A non-2xx status, an oversized body or a
//! body that is not JSON is a [`SourceError::FetchFailed`].

use std::time::Duration;

use serde_json::Value;
use sgen_core::{SchemaDocument, SourceKind};
use url::Url;

use crate::error::SourceError;
use crate::upload::document_id;

/// Default request timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default body-size cap (10 MiB).
pub const DEFAULT_MAX_FETCH_BYTES: usize = 10 * 1024 * 1024;

/// HTTP fetcher for URL sources.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl Fetcher {
    /// Build a fetcher with the given timeout and body cap.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::FetchFailed {
                url: "client_init".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            timeout,
            max_bytes,
        })
    }

    /// Configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parse and check a locator without fetching it.
    pub fn parse_locator(locator: &str) -> Result<Url, SourceError> {
        let url = Url::parse(locator)
            .map_err(|e| SourceError::InvalidLocator(format!("{locator:?}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SourceError::InvalidLocator(format!(
                "{locator:?}: scheme {other:?} is not http or https"
            ))),
        }
    }

    /// Fetch `locator` and parse the body as a schema document.
    pub async fn fetch(&self, locator: &str) -> Result<SchemaDocument, SourceError> {
        let url = Self::parse_locator(locator)?;
        let url_text = url.to_string();
        let failed = |reason: String| SourceError::FetchFailed {
            url: url_text.clone(),
            reason,
        };
        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                SourceError::Timeout {
                    url: url_text.clone(),
                    after: self.timeout,
                }
            } else {
                SourceError::FetchFailed {
                    url: url_text.clone(),
                    reason: e.to_string(),
                }
            }
        };

        tracing::debug!(url = %url_text, "fetching schema");
        let mut response = self.http.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status.as_u16())));
        }
        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                let limit = self.max_bytes;
                return Err(failed(format!("body of {len} bytes exceeds {limit} byte limit")));
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(failed(format!("body exceeds {} byte limit", self.max_bytes)));
            }
            body.extend_from_slice(&chunk);
        }

        let text = String::from_utf8(body).map_err(|_| failed("body is not UTF-8".into()))?;
        let parsed: Value =
            serde_json::from_str(&text).map_err(|e| failed(format!("body is not JSON: {e}")))?;

        let id = id_for_url(&url);
        tracing::debug!(url = %url_text, schema_id = %id, bytes = text.len(), "fetched schema");
        SchemaDocument::new(id, text, parsed, SourceKind::Url).map_err(|e| failed(e.to_string()))
    }
}

/// Document id for a URL: last non-empty path segment without a schema
/// suffix, else the host.
pub fn id_for_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(document_id)
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "schema".to_string())
}
