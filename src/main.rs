#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod core;
mod error;
mod registrar;
mod settings;
mod ui;

use anyhow::Result;
use clap::Parser;
use log::{debug, warn};
use std::path::PathBuf;

/// Minimal image viewer that steps through the images of a directory.
#[derive(Parser, Debug)]
#[command(name = "quickview", version, about)]
struct Args {
    /// Image file to open on launch
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let initial = args.file.filter(|path| {
        if path.is_file() {
            true
        } else {
            debug!("startup file {} not found, starting empty", path.display());
            false
        }
    });

    let settings = settings::load().unwrap_or_else(|e| {
        warn!("could not load settings: {e}");
        settings::Settings::default()
    });

    app::run(initial, settings)
}
