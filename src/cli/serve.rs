//! Serve command implementation

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::FaceConfig;
use crate::fetch::HttpTextureSource;
use crate::overrides::{watch_overrides, OverrideStore};
use crate::server::{self, App};
use crate::service::FaceService;

use super::{runtime, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the serve command
pub fn run_serve(config: FaceConfig) -> ExitCode {
    let dir = &config.overrides.dir;
    let store = match OverrideStore::open(dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Held for the lifetime of the server; dropping it stops the watcher.
    let _watcher = if config.overrides.watch {
        let debounce = Duration::from_millis(u64::from(config.overrides.debounce_ms));
        match watch_overrides(Arc::clone(&store), dir, debounce) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("hot reload disabled: {}", e);
                None
            }
        }
    } else {
        info!("hot reload disabled by configuration");
        None
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to start async runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let service = FaceService::new(HttpTextureSource::new(), store)
        .with_base_url(config.assets.base_url.clone())
        .with_default_width(config.faces.default_width);
    let app = Arc::new(App::new(service, config.faces.max_width));
    let addr = config.listen_addr();

    match rt.block_on(server::run(app, &addr)) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
