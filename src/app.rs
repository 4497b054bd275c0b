//! Native window bootstrap: restores the saved placement into the viewport
//! and hands the settings to the window for persistence on close.

use crate::settings::Settings;
use crate::ui::viewer::{ViewerApp, APP_TITLE};
use eframe::egui;
use std::path::PathBuf;

pub fn run(initial: Option<PathBuf>, settings: Settings) -> anyhow::Result<()> {
    let placement = settings.window.clone();
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size([placement.size.0, placement.size.1])
        .with_min_inner_size([400.0, 300.0])
        .with_maximized(placement.maximized);
    if let Some((x, y)) = placement.position {
        viewport = viewport.with_position(egui::pos2(x, y));
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(&cc.egui_ctx, initial, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the viewer: {e}"))
}
