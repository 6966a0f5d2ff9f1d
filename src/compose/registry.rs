//! Compositing strategies and their lookup.

use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;

use super::background::BackgroundComposer;
use super::error::ProcessingError;
use super::plain::PlainComposer;
use super::snout::SnoutComposer;
use crate::output::encode_png;
use crate::resolve::ResolvedRegions;

/// Which compositing strategy a face needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComposeMode {
    /// Crop and scale the face only
    Plain,
    /// Face with a snout overlay
    Snout,
    /// Face over background layers on a square canvas
    Background,
}

impl ComposeMode {
    /// Pick the mode for resolved regions: background, then snout, then plain.
    pub fn select(regions: &ResolvedRegions) -> Self {
        if regions.background.is_some() {
            ComposeMode::Background
        } else if regions.snout.is_some() {
            ComposeMode::Snout
        } else {
            ComposeMode::Plain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeMode::Plain => "plain",
            ComposeMode::Snout => "snout",
            ComposeMode::Background => "background",
        }
    }
}

impl fmt::Display for ComposeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy that turns a texture and resolved regions into a face image.
pub trait FaceComposer: Send + Sync {
    /// The mode this composer is registered under.
    fn mode(&self) -> ComposeMode;

    fn compose(
        &self,
        raster: &RgbaImage,
        out_width: u32,
        regions: &ResolvedRegions,
    ) -> Result<RgbaImage, ProcessingError>;
}

/// A finished face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    /// PNG-encoded image
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mode: ComposeMode,
}

/// Maps a [`ComposeMode`] to the composer that handles it.
///
/// Lookups for a mode with no registered composer use the plain crop.
pub struct ComposerRegistry {
    composers: HashMap<ComposeMode, Box<dyn FaceComposer>>,
    fallback: PlainComposer,
}

impl ComposerRegistry {
    /// Registry with no composers; every mode falls back to plain.
    pub fn empty() -> Self {
        Self { composers: HashMap::new(), fallback: PlainComposer }
    }

    /// Registry with the built-in plain, snout and background composers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PlainComposer));
        registry.register(Box::new(SnoutComposer));
        registry.register(Box::new(BackgroundComposer));
        registry
    }

    /// Add or replace the composer for its mode.
    pub fn register(&mut self, composer: Box<dyn FaceComposer>) {
        self.composers.insert(composer.mode(), composer);
    }

    pub fn get(&self, mode: ComposeMode) -> &dyn FaceComposer {
        match self.composers.get(&mode) {
            Some(composer) => composer.as_ref(),
            None => &self.fallback,
        }
    }

    /// Select a mode, compose and encode.
    pub fn compose(
        &self,
        raster: &RgbaImage,
        out_width: u32,
        regions: &ResolvedRegions,
    ) -> Result<Composed, ProcessingError> {
        let mode = ComposeMode::select(regions);
        let image = self.get(mode).compose(raster, out_width, regions)?;
        let png = encode_png(&image).map_err(ProcessingError::Encode)?;
        Ok(Composed { png, width: image.width(), height: image.height(), mode })
    }
}

impl Default for ComposerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComposerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modes: Vec<&str> = self.composers.keys().map(ComposeMode::as_str).collect();
        modes.sort_unstable();
        f.debug_struct("ComposerRegistry").field("modes", &modes).finish()
    }
}
