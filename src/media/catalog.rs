// SPDX-License-Identifier: MPL-2.0
//! Remote iris texture catalog.
//!
//! The catalog service answers a GET with
//! `{"success": bool, "data": [{"id", "title", "image"}]}` where `image` is a
//! path relative to a storage base URL. Loading is all-or-nothing: every
//! listed image is fetched and decoded concurrently, and the first failure
//! aborts the whole load.

use crate::application::port::{BlobFetcher, CatalogError};
use crate::domain::render::TextureId;
use crate::domain::texture::{Texture, TextureCatalog};
use futures_util::future::try_join_all;
use serde::Deserialize;

// =============================================================================
// Wire Format
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    success: bool,
    #[serde(default)]
    data: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    id: WireId,
    #[serde(default)]
    title: String,
    image: String,
}

/// Ids arrive either as JSON numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(serde_json::Number),
    Text(String),
}

impl From<WireId> for TextureId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => TextureId::new(n.to_string()),
            WireId::Text(s) => TextureId::new(s),
        }
    }
}

// =============================================================================
// Catalog Entries
// =============================================================================

/// One catalog entry with its image URL resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: TextureId,
    pub title: String,
    pub image_url: String,
}

/// Resolves an image path from the catalog against the storage base URL.
///
/// Absolute `http(s)` URLs are returned unchanged.
#[must_use]
pub fn resolve_image_url(storage_base: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        return image.to_string();
    }
    format!(
        "{}/{}",
        storage_base.trim_end_matches('/'),
        image.trim_start_matches('/')
    )
}

/// Parses a catalog response body.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidResponse`] for malformed JSON,
/// [`CatalogError::Rejected`] when `success` is false and
/// [`CatalogError::Empty`] when no entries are listed.
pub fn parse_catalog(body: &[u8], storage_base: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let response: CatalogResponse = serde_json::from_slice(body)
        .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

    if !response.success {
        return Err(CatalogError::Rejected);
    }
    if response.data.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(response
        .data
        .into_iter()
        .map(|entry| CatalogEntry {
            image_url: resolve_image_url(storage_base, &entry.image),
            id: entry.id.into(),
            title: entry.title,
        })
        .collect())
}

// =============================================================================
// Loading
// =============================================================================

/// Fetches the catalog listing from `catalog_url`.
///
/// # Errors
///
/// Returns [`CatalogError::FetchFailed`] if the request fails, or any error
/// from [`parse_catalog`].
pub async fn fetch_entries<F: BlobFetcher>(
    fetcher: &F,
    catalog_url: &str,
    storage_base: &str,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let body = fetcher
        .fetch(catalog_url)
        .await
        .map_err(CatalogError::FetchFailed)?;
    parse_catalog(&body, storage_base)
}

/// Fetches and decodes every entry concurrently.
///
/// Resolves only once all textures are decoded, in catalog order. The first
/// failure drops the remaining in-flight fetches.
///
/// # Errors
///
/// Returns [`CatalogError::TextureLoadFailed`] for the first image that
/// cannot be fetched or decoded.
pub async fn preload_textures<F: BlobFetcher>(
    fetcher: &F,
    entries: Vec<CatalogEntry>,
) -> Result<TextureCatalog, CatalogError> {
    let loads = entries.into_iter().map(|entry| async move {
        let bytes = fetcher
            .fetch(&entry.image_url)
            .await
            .map_err(|reason| CatalogError::TextureLoadFailed {
                url: entry.image_url.clone(),
                reason,
            })?;
        decode_texture(entry, &bytes)
    });

    let textures = try_join_all(loads).await?;
    Ok(TextureCatalog::new(textures))
}

/// Fetches the listing, then preloads every texture.
///
/// # Errors
///
/// Returns the first error of either stage.
pub async fn load_catalog<F: BlobFetcher>(
    fetcher: &F,
    catalog_url: &str,
    storage_base: &str,
) -> Result<TextureCatalog, CatalogError> {
    let entries = fetch_entries(fetcher, catalog_url, storage_base).await?;
    preload_textures(fetcher, entries).await
}

fn decode_texture(entry: CatalogEntry, bytes: &[u8]) -> Result<Texture, CatalogError> {
    let decoded = image_rs::load_from_memory(bytes).map_err(|e| CatalogError::TextureLoadFailed {
        url: entry.image_url.clone(),
        reason: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Texture::from_straight_rgba(entry.id, entry.title, width, height, rgba.into_raw()).ok_or(
        CatalogError::TextureLoadFailed {
            url: entry.image_url,
            reason: "empty image".to_string(),
        },
    )
}
