//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod render;
mod resolve;
mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::loader::{apply_env, check, load_config, merge_cli_overrides, CliOverrides};
use crate::config::FaceConfig;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// PixelFace - Serve Minecraft mob face icons cropped from entity textures
#[derive(Parser)]
#[command(name = "pixelface")]
#[command(about = "PixelFace - Serve Minecraft mob face icons cropped from entity textures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Config file (default: search upward for pixelface.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen port (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind
        #[arg(long)]
        bind: Option<String>,

        /// Directory holding the override JSON files
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Texture host base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Do not reload overrides when they change
        #[arg(long)]
        no_watch: bool,
    },

    /// Render one face to a PNG file
    Render {
        /// Mob name, e.g. "cow" or "black_cat"
        name: String,

        /// Requested output width in pixels
        #[arg(short, long)]
        width: Option<u32>,

        /// Output file (default: {name}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read the texture from a local PNG instead of the texture host
        #[arg(short, long)]
        texture: Option<PathBuf>,

        /// Config file (default: search upward for pixelface.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the override JSON files
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Texture host base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show how a name resolves: asset path, regions and mode
    Resolve {
        /// Mob name
        name: String,

        /// Requested output width, used to report the produced width
        #[arg(short, long)]
        width: Option<u32>,

        /// Texture size as WxH; fetched from the texture host when omitted
        #[arg(short, long)]
        size: Option<String>,

        /// Config file (default: search upward for pixelface.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the override JSON files
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Texture host base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

/// Main entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve { config, port, bind, overrides, base_url, no_watch } => {
            let cli_overrides = CliOverrides { port, bind, overrides_dir: overrides, no_watch, base_url };
            match resolve_config(config.as_deref(), &cli_overrides) {
                Ok(config) => serve::run_serve(config),
                Err(code) => code,
            }
        }
        Commands::Render { name, width, output, texture, config, overrides, base_url } => {
            let cli_overrides = CliOverrides { overrides_dir: overrides, base_url, ..Default::default() };
            match resolve_config(config.as_deref(), &cli_overrides) {
                Ok(config) => render::run_render(
                    &config,
                    &name,
                    width,
                    output.as_deref(),
                    texture.as_deref(),
                ),
                Err(code) => code,
            }
        }
        Commands::Resolve { name, width, size, config, overrides, base_url } => {
            let cli_overrides = CliOverrides { overrides_dir: overrides, base_url, ..Default::default() };
            match resolve_config(config.as_deref(), &cli_overrides) {
                Ok(config) => resolve::run_resolve(&config, &name, width, size.as_deref()),
                Err(code) => code,
            }
        }
    }
}

/// Logs go to stderr so `render` output piped elsewhere stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the config file, then layer `PORT` and command-line values on top.
fn resolve_config(
    path: Option<&std::path::Path>,
    cli_overrides: &CliOverrides,
) -> Result<FaceConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    apply_env(&mut config);
    merge_cli_overrides(&mut config, cli_overrides);

    if let Err(e) = check(&config) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    Ok(config)
}

/// Lowercase and validate a mob name given on the command line.
pub(crate) fn normalize_name(name: &str) -> Option<String> {
    let name = name.to_lowercase();
    crate::server::is_valid_name(&name).then_some(name)
}

/// Parse a `WxH` size such as `64x32`.
pub(crate) fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (w, h) = size.split_once(['x', 'X'])?;
    match (w.trim().parse::<u32>(), h.trim().parse::<u32>()) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    }
}

/// Build a runtime for one-shot async work.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}
