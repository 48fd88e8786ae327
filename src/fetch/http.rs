// src/fetch/http.rs
// =============================================================================
// This module retrieves the page under audit.
//
// Key functionality:
// - One GET per checker invocation, no retries
// - Bounded timeout and an identifying User-Agent
// - Categorizes reqwest failures into readable reasons (timeout, DNS, TLS...)
// =============================================================================

use super::DocumentSource;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

/// Fetches documents over HTTP(S) with reqwest
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Builds a client that honours the configured timeout and User-Agent
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| EngineError::Unclassified(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpSource { client })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> EngineResult<String> {
        let target =
            Url::parse(url).map_err(|e| EngineError::fetch(url, format!("invalid URL: {}", e)))?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::fetch(url, format!("HTTP {}", status.as_u16())));
        }

        // A timeout while streaming the body is still a fetch failure;
        // anything else means the bytes could not be decoded as text
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                categorize_error(url, e)
            } else {
                EngineError::parse(format!("could not decode response body: {}", e))
            }
        })?;

        debug!("Fetched {} ({} bytes, HTTP {})", url, body.len(), status.as_u16());
        Ok(body)
    }
}

// Maps reqwest errors to a short reason, most specific first
fn categorize_error(url: &str, error: reqwest::Error) -> EngineError {
    let error_string = error.to_string();

    let reason = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            "Connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    };

    EngineError::fetch(url, reason)
}
