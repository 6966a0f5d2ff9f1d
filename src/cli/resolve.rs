//! Resolve command implementation

use std::process::ExitCode;
use std::sync::Arc;

use crate::compose::ComposeMode;
use crate::config::FaceConfig;
use crate::fetch::HttpTextureSource;
use crate::overrides::OverrideStore;
use crate::scale::snap;
use crate::service::{FaceService, Resolution};

use super::{normalize_name, parse_size, runtime, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the resolve command
pub fn run_resolve(config: &FaceConfig, name: &str, width: Option<u32>, size: Option<&str>) -> ExitCode {
    let Some(name) = normalize_name(name) else {
        eprintln!("Error: Invalid mob name '{}'. Use letters, digits, '_' and '-'", name);
        return ExitCode::from(EXIT_INVALID_ARGS);
    };
    let size = match size.map(parse_size) {
        Some(Some(size)) => Some(size),
        Some(None) => {
            eprintln!("Error: Invalid size format. Use WxH format (e.g., '64x32')");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        None => None,
    };

    let store = match OverrideStore::open(&config.overrides.dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let service = FaceService::new(HttpTextureSource::new(), store)
        .with_base_url(config.assets.base_url.clone())
        .with_default_width(config.faces.default_width);

    let size = match size {
        Some(size) => size,
        None => {
            let fetched = runtime()
                .map_err(|e| e.to_string())
                .and_then(|rt| rt.block_on(service.texture_size(&name)).map_err(|e| e.to_string()));
            match fetched {
                Ok(size) => size,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
    };

    match service.resolve(&name, size) {
        Ok(resolution) => {
            let width = width.unwrap_or(service.default_width());
            print!("{}", describe(&name, size, width, &resolution));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn describe(name: &str, size: (u32, u32), width: u32, resolution: &Resolution) -> String {
    let regions = &resolution.regions;
    let produced = match resolution.mode {
        ComposeMode::Plain => width,
        ComposeMode::Snout | ComposeMode::Background => snap(width, regions.face.width),
    };

    let mut out = String::new();
    out.push_str(&format!("name:       {}\n", name));
    out.push_str(&format!("asset path: {}\n", resolution.asset_path));
    out.push_str(&format!("texture:    {}x{}\n", size.0, size.1));
    for url in &resolution.urls {
        out.push_str(&format!("url:        {}\n", url));
    }
    out.push_str(&format!("face:       {}\n", regions.face));
    match &regions.snout {
        Some(snout) => out.push_str(&format!("snout:      {}\n", snout)),
        None => out.push_str("snout:      -\n"),
    }
    match &regions.background {
        Some(layers) => {
            let layers: Vec<String> = layers.iter().map(ToString::to_string).collect();
            out.push_str(&format!("background: {}\n", layers.join(", ")));
        }
        None => out.push_str("background: -\n"),
    }
    out.push_str(&format!("mode:       {}\n", resolution.mode));
    out.push_str(&format!("width:      {} -> {}\n", width, produced));
    out
}
