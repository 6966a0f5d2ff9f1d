//! Face rendering pipeline: resolve, fetch, probe, composite.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::compose::raster::{decode, probe_dimensions};
use crate::compose::{ComposeMode, ComposerRegistry, ProcessingError};
use crate::fetch::{texture_urls, FetchError, TextureSource, DEFAULT_BASE_URL};
use crate::overrides::OverrideStore;
use crate::resolve::{resolve_asset_path, resolve_regions, EntryError, ResolvedRegions};

/// Output width used when a request does not specify one.
pub const DEFAULT_WIDTH: u32 = 64;

/// Why a face could not be produced.
///
/// Only [`FaceError::NotFound`] is an expected outcome; everything else is a
/// server-side failure.
#[derive(Debug, Error)]
pub enum FaceError {
    /// No texture at any candidate location, or the mob is disabled
    #[error("no texture found for '{name}'")]
    NotFound { name: String },
    /// Non-404 failure reaching the texture host
    #[error("texture fetch failed: {0}")]
    Upstream(#[from] FetchError),
    /// Texture header could not be read
    #[error("failed to read texture dimensions: {0}")]
    Metadata(#[source] image::ImageError),
    /// Malformed override entry
    #[error("invalid override: {0}")]
    Config(#[from] EntryError),
    /// Crop, resize, composite or encode failure
    #[error("image processing failed: {0}")]
    Processing(#[from] ProcessingError),
}

impl FaceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FaceError::NotFound { .. })
    }
}

/// A rendered face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub requested_width: u32,
    pub mode: ComposeMode,
}

impl FaceImage {
    /// The width actually produced, when snapping changed it.
    pub fn actual_width(&self) -> Option<u32> {
        (self.width != self.requested_width).then_some(self.width)
    }
}

/// How a name resolves, without fetching anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub asset_path: String,
    pub urls: Vec<String>,
    pub regions: ResolvedRegions,
    pub mode: ComposeMode,
}

/// Turns mob names into face PNGs.
pub struct FaceService<S> {
    source: S,
    overrides: Arc<OverrideStore>,
    composers: Arc<ComposerRegistry>,
    base_url: String,
    default_width: u32,
}

impl<S: TextureSource> FaceService<S> {
    pub fn new(source: S, overrides: Arc<OverrideStore>) -> Self {
        Self {
            source,
            overrides,
            composers: Arc::new(ComposerRegistry::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_width: DEFAULT_WIDTH,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_width(mut self, width: u32) -> Self {
        self.default_width = width;
        self
    }

    pub fn with_composers(mut self, composers: ComposerRegistry) -> Self {
        self.composers = Arc::new(composers);
        self
    }

    pub fn overrides(&self) -> &Arc<OverrideStore> {
        &self.overrides
    }

    pub fn default_width(&self) -> u32 {
        self.default_width
    }

    /// Render the face for a lowercase `name`.
    pub async fn render(&self, name: &str, width: Option<u32>) -> Result<FaceImage, FaceError> {
        let requested_width = width.unwrap_or(self.default_width);
        let overrides = self.overrides.snapshot();

        let asset_path = resolve_asset_path(name, &overrides.asset_mappings)?
            .ok_or_else(|| FaceError::NotFound { name: name.to_string() })?;

        let bytes = self.fetch_texture(name, &asset_path).await?;
        let size = probe_dimensions(&bytes).map_err(FaceError::Metadata)?;
        let regions = resolve_regions(name, &overrides, &asset_path, size)?;
        debug!(name, asset_path = %asset_path, width = requested_width, mode = %ComposeMode::select(&regions), "composing face");

        let composers = Arc::clone(&self.composers);
        let composed = tokio::task::spawn_blocking(move || {
            let raster = decode(&bytes)?;
            composers.compose(&raster, requested_width, &regions)
        })
        .await
        .map_err(|e| ProcessingError::Task(e.to_string()))??;

        Ok(FaceImage {
            png: composed.png,
            width: composed.width,
            height: composed.height,
            requested_width,
            mode: composed.mode,
        })
    }

    /// Resolve asset path and regions for a texture of a known size.
    pub fn resolve(&self, name: &str, texture_size: (u32, u32)) -> Result<Resolution, FaceError> {
        let overrides = self.overrides.snapshot();
        let asset_path = resolve_asset_path(name, &overrides.asset_mappings)?
            .ok_or_else(|| FaceError::NotFound { name: name.to_string() })?;
        let regions = resolve_regions(name, &overrides, &asset_path, texture_size)?;
        Ok(Resolution {
            urls: texture_urls(&self.base_url, &asset_path, name),
            mode: ComposeMode::select(&regions),
            asset_path,
            regions,
        })
    }

    /// Fetch the texture for `name` and read its dimensions.
    pub async fn texture_size(&self, name: &str) -> Result<(u32, u32), FaceError> {
        let overrides = self.overrides.snapshot();
        let asset_path = resolve_asset_path(name, &overrides.asset_mappings)?
            .ok_or_else(|| FaceError::NotFound { name: name.to_string() })?;
        let bytes = self.fetch_texture(name, &asset_path).await?;
        probe_dimensions(&bytes).map_err(FaceError::Metadata)
    }

    /// Try each candidate URL until one has the texture.
    async fn fetch_texture(&self, name: &str, asset_path: &str) -> Result<Vec<u8>, FaceError> {
        for url in texture_urls(&self.base_url, asset_path, name) {
            match self.source.fetch(&url).await? {
                Some(bytes) => return Ok(bytes),
                None => info!(url = %url, "texture not found, trying next location"),
            }
        }
        Err(FaceError::NotFound { name: name.to_string() })
    }
}
