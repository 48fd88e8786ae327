// src/fetch/mod.rs
// =============================================================================
// This module turns a caller-supplied address into something checkers can
// query.
//
// Submodules:
// - http: Retrieves page markup over HTTP (the real DocumentSource)
// - context: Parses markup into a DocumentContext (tree + text sample)
//
// The DocumentSource trait is the seam tests use to feed fixture markup to
// checkers without touching the network.
// =============================================================================

mod context;
mod http;

pub use context::{selector, DocumentContext};
pub use http::HttpSource;

use crate::error::EngineResult;
use async_trait::async_trait;

/// Anything that can hand back the markup for a URL
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw markup for an already-normalized URL
    async fn fetch(&self, url: &str) -> EngineResult<String>;
}

/// Canonicalizes an address before any network access
///
/// Addresses without an http/https scheme get `https://` prepended.
/// Already-prefixed addresses come back unchanged.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
