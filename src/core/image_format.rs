//! Recognized image file extensions and their MIME mapping.

use std::path::Path;

/// Extensions the viewer recognizes when scanning a directory.
///
/// `wmp` (Windows Media Photo) is kept for parity with the file-open filter
/// even though decoding it may fail outside Windows codecs.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "wmp"];

/// Case-insensitive extension match against [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Filter entry for the file-open dialog.
pub fn dialog_filter() -> (&'static str, &'static [&'static str]) {
    ("Images", &SUPPORTED_EXTENSIONS)
}

/// MIME type for a recognized extension, used when registering file
/// associations.
pub fn mime_type(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "wmp" => Some("image/vnd.ms-photo"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn matches_extensions_case_insensitively() {
        assert!(is_supported(&PathBuf::from("/tmp/a.jpg")));
        assert!(is_supported(&PathBuf::from("/tmp/B.JPG")));
        assert!(is_supported(&PathBuf::from("/tmp/c.PnG")));
        assert!(is_supported(&PathBuf::from("/tmp/d.wmp")));
    }

    #[test]
    fn rejects_unrecognized_files() {
        assert!(!is_supported(&PathBuf::from("/tmp/d.txt")));
        assert!(!is_supported(&PathBuf::from("/tmp/archive.tar.gz")));
        assert!(!is_supported(&PathBuf::from("/tmp/noextension")));
    }

    #[test]
    fn every_supported_extension_has_a_mime_type() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(mime_type(ext).is_some(), "missing mime type for {ext}");
        }
        assert_eq!(mime_type("txt"), None);
    }
}
