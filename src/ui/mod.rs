pub mod properties;
pub mod viewer;
