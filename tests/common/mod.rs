//! Shared test harness: an in-memory texture host and texture builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};
use pixelface::fetch::{FetchError, TextureSource};
use pixelface::output::encode_png;
use pixelface::overrides::{OverrideMap, OverrideSet, OverrideStore};
use pixelface::service::FaceService;
use serde_json::Value;

pub const BASE_URL: &str = "https://textures.test/entity";

/// What the fake host answers for one URL.
#[derive(Debug, Clone)]
pub enum Stub {
    Png(Vec<u8>),
    Missing,
    Fail(u16),
}

/// In-memory texture host that records every URL requested.
#[derive(Debug, Default)]
pub struct FakeSource {
    stubs: HashMap<String, Stub>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `{BASE_URL}/{path}.png` with `stub`.
    pub fn with(mut self, path: &str, stub: Stub) -> Self {
        self.stubs.insert(url(path), stub);
        self
    }

    /// Handle to the request log, usable after the source is moved.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

impl TextureSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.stubs.get(url) {
            Some(Stub::Png(bytes)) => Ok(Some(bytes.clone())),
            Some(Stub::Fail(status)) => Err(FetchError::Status { url: url.to_string(), status: *status }),
            Some(Stub::Missing) | None => Ok(None),
        }
    }
}

pub fn url(path: &str) -> String {
    format!("{}/{}.png", BASE_URL, path)
}

/// Texture where pixel (x, y) has color (x, y, 0, 255).
pub fn texture(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
    encode_png(&image).unwrap()
}

pub fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

pub fn map(pairs: &[(&str, Value)]) -> OverrideMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Service over `source` with the given overrides.
pub fn service(source: FakeSource, set: OverrideSet) -> FaceService<FakeSource> {
    FaceService::new(source, Arc::new(OverrideStore::new(set))).with_base_url(BASE_URL)
}
