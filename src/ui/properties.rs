//! File properties shown by the properties dialog.

use crate::error::{AppError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// Snapshot of the displayed file's metadata, computed when the dialog is
/// opened.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProperties {
    pub file_name: String,
    pub created: String,
    pub size_kb: u64,
    pub width: usize,
    pub height: usize,
}

impl ImageProperties {
    /// Reads metadata for `path`. `dimensions` come from the decoded
    /// texture, not the file. Creation time falls back to mtime on
    /// filesystems without birth timestamps.
    pub fn from_file(path: &Path, dimensions: (usize, usize)) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| AppError::ImageLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(|t| {
                DateTime::<Local>::from(t)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|_| "unknown".to_string());

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(AppError::NoCurrentImage)?;

        Ok(Self {
            file_name,
            created,
            size_kb: metadata.len() / 1024,
            width: dimensions.0,
            height: dimensions.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn reports_truncated_kibibytes() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("two_kb.png");
        let mut file = fs::File::create(&path).expect("failed to create test file");
        file.write_all(&vec![0u8; 2048]).expect("write failed");

        let props = ImageProperties::from_file(&path, (8, 4)).expect("metadata failed");
        assert_eq!(props.size_kb, 2);
        assert_eq!(props.file_name, "two_kb.png");
        assert_eq!((props.width, props.height), (8, 4));
    }

    #[test]
    fn sub_kilobyte_file_truncates_to_zero() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("tiny.bmp");
        fs::write(&path, vec![0u8; 1023]).expect("write failed");

        let props = ImageProperties::from_file(&path, (1, 1)).expect("metadata failed");
        assert_eq!(props.size_kb, 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ImageProperties::from_file(Path::new("/nonexistent/x.png"), (1, 1)).is_err());
    }
}
