//! Unified error type for the viewer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read directory: {0}")]
    DirectoryScan(#[from] std::io::Error),

    #[error("there are no images in the current directory")]
    EmptyImageSet,

    #[error("no image is currently loaded")]
    NoCurrentImage,

    #[error("failed to load {}: {reason}", path.display())]
    ImageLoad { path: PathBuf, reason: String },

    #[error("failed to persist settings: {0}")]
    Settings(String),

    #[error("failed to register as default viewer: {0}")]
    Register(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
