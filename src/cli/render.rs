//! Render command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::FaceConfig;
use crate::fetch::{FileTextureSource, HttpTextureSource, TextureSource};
use crate::output::save_png_bytes;
use crate::overrides::OverrideStore;
use crate::service::{FaceError, FaceImage, FaceService};

use super::{normalize_name, runtime, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(
    config: &FaceConfig,
    name: &str,
    width: Option<u32>,
    output: Option<&Path>,
    texture: Option<&Path>,
) -> ExitCode {
    let Some(name) = normalize_name(name) else {
        eprintln!("Error: Invalid mob name '{}'. Use letters, digits, '_' and '-'", name);
        return ExitCode::from(EXIT_INVALID_ARGS);
    };
    if let Some(w) = width {
        if w == 0 || w > config.faces.max_width {
            eprintln!("Error: Width must be between 1 and {}", config.faces.max_width);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    let store = match OverrideStore::open(&config.overrides.dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to start async runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let result = match texture {
        Some(path) => rt.block_on(render_with(FileTextureSource::new(path), config, store, &name, width)),
        None => rt.block_on(render_with(HttpTextureSource::new(), config, store, &name, width)),
    };

    let face = match result {
        Ok(face) => face,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(format!("{}.png", name)));
    if let Err(e) = save_png_bytes(&face.png, &output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {} ({}x{}, {} mode)", output.display(), face.width, face.height, face.mode);
    if face.actual_width().is_some() {
        println!("  width snapped from {}", face.requested_width);
    }
    ExitCode::from(EXIT_SUCCESS)
}

async fn render_with<S: TextureSource>(
    source: S,
    config: &FaceConfig,
    store: Arc<OverrideStore>,
    name: &str,
    width: Option<u32>,
) -> Result<FaceImage, FaceError> {
    FaceService::new(source, store)
        .with_base_url(config.assets.base_url.clone())
        .with_default_width(config.faces.default_width)
        .render(name, width)
        .await
}
