// SPDX-License-Identifier: MPL-2.0
//! Catalog loading against an in-memory fetcher.

use iris_lens::app::{Phase, Session, StatusMessage};
use iris_lens::application::port::{BlobFetcher, CatalogError};
use iris_lens::domain::frame::Frame;
use iris_lens::domain::render::{RenderConfig, TextureId};
use iris_lens::error::{Error, ErrorCategory};
use iris_lens::media::catalog::load_catalog;
use iris_lens::media::snapshot::encode_png;
use std::collections::HashMap;
use std::future::Future;

const CATALOG_URL: &str = "https://catalog.test/api/irises";
const STORAGE: &str = "https://catalog.test/storage";

/// Serves fixed bodies by URL; anything else is a 404.
#[derive(Default)]
struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl FakeFetcher {
    fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

impl BlobFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, String>> + Send {
        let result = self
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| format!("HTTP 404 for {url}"));
        async move { result }
    }
}

fn png(rgba: [u8; 4]) -> Vec<u8> {
    encode_png(&Frame::filled(3, 3, rgba)).expect("png")
}

fn listing() -> Vec<u8> {
    br#"{
        "success": true,
        "data": [
            {"id": 1, "title": "Ocean", "image": "irises/ocean.png"},
            {"id": "abc", "title": "Amber", "image": "/irises/amber.png"}
        ]
    }"#
    .to_vec()
}

#[tokio::test]
async fn loads_every_texture_in_catalog_order() {
    let fetcher = FakeFetcher::default()
        .with(CATALOG_URL, listing())
        .with(&format!("{STORAGE}/irises/ocean.png"), png([0, 0, 255, 255]))
        .with(&format!("{STORAGE}/irises/amber.png"), png([255, 160, 0, 255]));

    let catalog = load_catalog(&fetcher, CATALOG_URL, STORAGE)
        .await
        .expect("catalog");

    let ids: Vec<&str> = catalog.iter().map(|t| t.id().as_str()).collect();
    assert_eq!(ids, ["1", "abc"]);
    let ocean = catalog.get(&TextureId::new("1")).expect("ocean");
    assert_eq!(ocean.title(), "Ocean");
    assert_eq!((ocean.width(), ocean.height()), (3, 3));
}

#[tokio::test]
async fn one_missing_image_fails_the_whole_catalog() {
    let fetcher = FakeFetcher::default()
        .with(CATALOG_URL, listing())
        .with(&format!("{STORAGE}/irises/ocean.png"), png([0, 0, 255, 255]));

    let err = load_catalog(&fetcher, CATALOG_URL, STORAGE)
        .await
        .expect_err("amber is missing");

    assert_eq!(
        err,
        CatalogError::TextureLoadFailed {
            url: format!("{STORAGE}/irises/amber.png"),
            reason: format!("HTTP 404 for {STORAGE}/irises/amber.png"),
        }
    );

    let mut session = Session::new(RenderConfig::default());
    assert!(!session.catalog_loaded(Err(Error::from(err))));
    assert!(!session.is_catalog_ready());
    assert_eq!(session.phase(), &Phase::LoadingCatalog);
    assert_eq!(
        session.status(),
        Some(&StatusMessage::Error(
            ErrorCategory::TexturePreload.user_message()
        ))
    );
}

#[tokio::test]
async fn undecodable_image_is_a_texture_failure() {
    let fetcher = FakeFetcher::default()
        .with(CATALOG_URL, listing())
        .with(&format!("{STORAGE}/irises/ocean.png"), png([0, 0, 255, 255]))
        .with(&format!("{STORAGE}/irises/amber.png"), b"not an image".to_vec());

    let err = load_catalog(&fetcher, CATALOG_URL, STORAGE)
        .await
        .expect_err("amber is corrupt");

    assert!(err.is_texture_failure());
}

#[tokio::test]
async fn service_failure_flag_is_rejected() {
    let fetcher = FakeFetcher::default().with(
        CATALOG_URL,
        br#"{"success": false, "data": []}"#.to_vec(),
    );

    let err = load_catalog(&fetcher, CATALOG_URL, STORAGE)
        .await
        .expect_err("rejected");

    assert_eq!(err, CatalogError::Rejected);
    assert_eq!(Error::from(err).category(), ErrorCategory::CatalogFetch);
}

#[tokio::test]
async fn unreachable_catalog_is_a_fetch_failure() {
    let fetcher = FakeFetcher::default();

    let err = load_catalog(&fetcher, CATALOG_URL, STORAGE)
        .await
        .expect_err("no listing");

    assert!(matches!(err, CatalogError::FetchFailed(_)));
}
