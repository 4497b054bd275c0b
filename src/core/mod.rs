pub mod image_format;
pub mod loader;
pub mod navigator;
