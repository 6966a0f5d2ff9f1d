//! PixelFace - Minecraft mob face icons cropped from entity textures
//!
//! This library provides functionality to:
//! - Resolve a mob name to a texture path and face, snout and background regions
//!   using wildcard-keyed override files that hot reload from disk
//! - Fetch the texture and composite a scaled, pixel-perfect face PNG
//! - Serve faces over HTTP at `/faces/{name}?width=N`

pub mod cli;
pub mod compose;
pub mod config;
pub mod fetch;
pub mod models;
pub mod output;
pub mod overrides;
pub mod resolve;
pub mod scale;
pub mod server;
pub mod service;
pub mod wildcard;
