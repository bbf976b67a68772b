// SPDX-License-Identifier: MPL-2.0
//! Remote resource port used by the texture catalog loader.

use std::fmt;
use std::future::Future;

/// Errors raised while loading the texture catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The catalog request failed (network, HTTP status).
    FetchFailed(String),
    /// The catalog body is not the expected JSON.
    InvalidResponse(String),
    /// The service answered with `success: false`.
    Rejected,
    /// The catalog lists no textures.
    Empty,
    /// A texture image could not be fetched or decoded.
    TextureLoadFailed { url: String, reason: String },
}

impl CatalogError {
    /// Returns `true` for texture preload failures, as opposed to failures
    /// of the catalog request itself.
    #[must_use]
    pub fn is_texture_failure(&self) -> bool {
        matches!(self, CatalogError::TextureLoadFailed { .. })
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::FetchFailed(msg) => write!(f, "Catalog request failed: {msg}"),
            CatalogError::InvalidResponse(msg) => write!(f, "Invalid catalog response: {msg}"),
            CatalogError::Rejected => write!(f, "Catalog service reported failure"),
            CatalogError::Empty => write!(f, "Catalog contains no textures"),
            CatalogError::TextureLoadFailed { url, reason } => {
                write!(f, "Failed to load image {url}: {reason}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Port for fetching remote bytes by URL.
///
/// Errors are plain strings; the catalog loader decides which
/// [`CatalogError`] they become.
pub trait BlobFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, String>> + Send;
}
