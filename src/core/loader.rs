//! Off-thread image decoding.
//!
//! Decoding runs on a spawned thread and the finished texture comes back
//! over an mpsc channel, so the UI thread never blocks on a large file.
//! Each load request creates a fresh channel; the viewer keeps only the
//! newest receiver, so a superseded load's send fails and its result is
//! dropped (last request wins).

use crate::error::{AppError, Result};
use egui::{ColorImage, TextureOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// A decoded image ready for display.
pub struct LoadedImage {
    pub path: PathBuf,
    pub texture: egui::TextureHandle,
}

impl LoadedImage {
    /// Pixel dimensions of the decoded image.
    pub fn dimensions(&self) -> (usize, usize) {
        let size = self.texture.size();
        (size[0], size[1])
    }
}

/// Starts decoding `path` on a background thread and returns the receiver
/// for its result. A repaint is requested once the result is in.
pub fn spawn_load(ctx: &egui::Context, path: PathBuf) -> Receiver<Result<LoadedImage>> {
    let ctx = ctx.clone();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = load_texture(&ctx, &path);
        if tx.send(result).is_ok() {
            ctx.request_repaint();
        }
    });
    rx
}

/// Reads and decodes `path`, uploading it as a texture.
pub fn load_texture(ctx: &egui::Context, path: &Path) -> Result<LoadedImage> {
    let bytes = fs::read(path).map_err(|e| AppError::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| AppError::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    let texture = ctx.load_texture(
        path.display().to_string(),
        color_image,
        TextureOptions::LINEAR,
    );
    Ok(LoadedImage {
        path: path.to_path_buf(),
        texture,
    })
}
