//! Directory image navigation: the ordered list of sibling images and the
//! position of the one currently on screen.

use crate::core::image_format;
use crate::error::{AppError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns the list of image files in the current directory and the index of
/// the displayed one.
///
/// The list is rebuilt from scratch on every [`DirectoryNavigator::open`];
/// the index is `None` until an open succeeds, or when the opened file was
/// not found in the freshly scanned list (unsupported extension picked via
/// the dialog, or the directory changed underneath us). Stepping with no
/// valid index is a reported error, never an out-of-bounds access.
#[derive(Debug, Default)]
pub struct DirectoryNavigator {
    images: Vec<PathBuf>,
    current: Option<usize>,
}

impl DirectoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path`: scans its parent directory for supported images,
    /// replaces the image list, and positions the index on `path`.
    ///
    /// Returns the canonical path to display. The path is canonicalized
    /// before the index lookup so that relative or differently-cased forms
    /// still match the scanned entries. On error the previous list and
    /// index are left untouched.
    pub fn open(&mut self, path: &Path) -> Result<PathBuf> {
        let path = fs::canonicalize(path)?;
        let parent = path.parent().ok_or_else(|| {
            AppError::DirectoryScan(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} has no parent directory", path.display()),
            ))
        })?;

        let mut images: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && image_format::is_supported(p))
            .collect();
        sort_case_insensitive(&mut images);

        self.current = images.iter().position(|p| p == &path);
        self.images = images;
        debug!(
            "scanned {}: {} images, index {:?}",
            parent.display(),
            self.images.len(),
            self.current
        );
        Ok(path)
    }

    /// Moves the index by `delta`, wrapping around in both directions, and
    /// returns the new current path.
    pub fn step(&mut self, delta: isize) -> Result<&Path> {
        if self.images.is_empty() {
            return Err(AppError::EmptyImageSet);
        }
        let current = self.current.ok_or(AppError::NoCurrentImage)?;
        let len = self.images.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        self.current = Some(next);
        Ok(&self.images[next])
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.map(|i| self.images[i].as_path())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Whether stepping is currently possible.
    pub fn can_step(&self) -> bool {
        self.current.is_some() && !self.images.is_empty()
    }
}

/// Case-insensitive path ordering, with the exact path as tie-break so the
/// order is total for a given directory snapshot.
fn sort_case_insensitive(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        let ka = a.to_string_lossy().to_lowercase();
        let kb = b.to_string_lossy().to_lowercase();
        ka.cmp(&kb).then_with(|| a.cmp(b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).expect("failed to create test file");
        file.write_all(b"fake image data")
            .expect("failed to write test file");
        path
    }

    #[test]
    fn new_navigator_is_empty() {
        let nav = DirectoryNavigator::new();
        assert!(nav.is_empty());
        assert_eq!(nav.len(), 0);
        assert_eq!(nav.current_path(), None);
        assert!(!nav.can_step());
    }

    #[test]
    fn open_filters_and_sorts_case_insensitively() {
        let dir = tempdir().expect("failed to create temp dir");
        let a = create_file(dir.path(), "a.png");
        let c = create_file(dir.path(), "c.jpg");
        let b = create_file(dir.path(), "B.JPG");
        create_file(dir.path(), "d.txt");

        let mut nav = DirectoryNavigator::new();
        nav.open(&c).expect("open failed");

        let canonical = |p: &Path| fs::canonicalize(p).unwrap();
        assert_eq!(nav.len(), 3);
        assert_eq!(nav.images, vec![canonical(&a), canonical(&b), canonical(&c)]);
        assert_eq!(nav.current_index(), Some(2));
    }

    #[test]
    fn step_wraps_at_both_boundaries() {
        let dir = tempdir().expect("failed to create temp dir");
        let a = create_file(dir.path(), "a.png");
        let c = create_file(dir.path(), "c.jpg");
        create_file(dir.path(), "B.JPG");
        create_file(dir.path(), "d.txt");

        let mut nav = DirectoryNavigator::new();
        nav.open(&c).expect("open failed");
        assert_eq!(nav.current_index(), Some(2));

        // Past the end wraps to the front.
        nav.step(1).expect("step failed");
        assert_eq!(nav.current_index(), Some(0));
        assert_eq!(nav.current_path(), Some(fs::canonicalize(&a).unwrap().as_path()));

        // Before the front wraps to the back.
        nav.step(-1).expect("step failed");
        assert_eq!(nav.current_index(), Some(2));
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let dir = tempdir().expect("failed to create temp dir");
        let b = create_file(dir.path(), "b.png");
        create_file(dir.path(), "a.jpg");
        create_file(dir.path(), "c.gif");

        let mut nav = DirectoryNavigator::new();
        nav.open(&b).expect("open failed");
        let start = nav.current_index();
        for _ in 0..nav.len() {
            nav.step(1).expect("step failed");
        }
        assert_eq!(nav.current_index(), start);
    }

    #[test]
    fn step_back_then_forward_is_identity() {
        let dir = tempdir().expect("failed to create temp dir");
        let b = create_file(dir.path(), "b.png");
        create_file(dir.path(), "a.jpg");
        create_file(dir.path(), "c.gif");

        let mut nav = DirectoryNavigator::new();
        nav.open(&b).expect("open failed");
        let start = nav.current_index();
        nav.step(-1).expect("step failed");
        nav.step(1).expect("step failed");
        assert_eq!(nav.current_index(), start);
    }

    #[test]
    fn step_on_empty_set_is_a_reported_error() {
        let mut nav = DirectoryNavigator::new();
        assert!(matches!(nav.step(1), Err(AppError::EmptyImageSet)));
        assert!(matches!(nav.step(-1), Err(AppError::EmptyImageSet)));
        assert!(nav.is_empty());
    }

    #[test]
    fn opening_unsupported_file_leaves_index_unset() {
        let dir = tempdir().expect("failed to create temp dir");
        create_file(dir.path(), "a.png");
        let txt = create_file(dir.path(), "notes.txt");

        let mut nav = DirectoryNavigator::new();
        nav.open(&txt).expect("open failed");

        assert_eq!(nav.len(), 1);
        assert_eq!(nav.current_index(), None);
        assert_eq!(nav.current_path(), None);
        assert!(!nav.can_step());
        assert!(matches!(nav.step(1), Err(AppError::NoCurrentImage)));
    }

    #[test]
    fn failed_open_preserves_previous_state() {
        let dir = tempdir().expect("failed to create temp dir");
        let a = create_file(dir.path(), "a.png");

        let mut nav = DirectoryNavigator::new();
        nav.open(&a).expect("open failed");
        assert_eq!(nav.len(), 1);

        let missing = dir.path().join("gone.jpg");
        assert!(nav.open(&missing).is_err());
        assert_eq!(nav.len(), 1);
        assert_eq!(nav.current_index(), Some(0));
    }

    #[test]
    fn open_matches_relative_path_forms() {
        let dir = tempdir().expect("failed to create temp dir");
        let a = create_file(dir.path(), "a.png");

        // A non-canonical spelling of the same file still resolves.
        let dotted = dir.path().join(".").join("a.png");
        let mut nav = DirectoryNavigator::new();
        let shown = nav.open(&dotted).expect("open failed");
        assert_eq!(shown, fs::canonicalize(&a).unwrap());
        assert_eq!(nav.current_index(), Some(0));
    }
}
