//! PixelFace - HTTP service and command-line tool for Minecraft mob face icons

use std::process::ExitCode;

use pixelface::cli;

fn main() -> ExitCode {
    cli::run()
}
