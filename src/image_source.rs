//! Resolution of opaque image locators into encoded bytes
//!
//! The capture front-end hands the engine URIs it owns. An [`ImageSource`]
//! is the seam where the host plugs in its own resolver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, ReportResult};

/// Resolves an image locator to the encoded image file contents
pub trait ImageSource: Send + Sync {
    fn fetch(&self, locator: &str) -> ReportResult<Vec<u8>>;
}

/// Reads locators as filesystem paths or `file://` URIs
///
/// Relative paths are resolved against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    base_dir: Option<PathBuf>,
}

impl FileImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        let raw = locator.strip_prefix("file://").unwrap_or(locator);
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageSource for FileImageSource {
    fn fetch(&self, locator: &str) -> ReportResult<Vec<u8>> {
        if locator.contains("://") && !locator.starts_with("file://") {
            return Err(ReportError::image_load(locator, "unsupported URI scheme"));
        }
        let path = self.resolve(locator);
        std::fs::read(&path).map_err(|e| ReportError::image_load(locator, e))
    }
}

/// In-memory images keyed by locator
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: impl Into<String>, data: Vec<u8>) {
        self.images.insert(locator.into(), data);
    }

    pub fn with(mut self, locator: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(locator, data);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn fetch(&self, locator: &str) -> ReportResult<Vec<u8>> {
        self.images
            .get(locator)
            .cloned()
            .ok_or_else(|| ReportError::image_load(locator, "no image registered for locator"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_reads_paths_and_file_uris() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foto.jpg"), b"bytes").unwrap();

        let source = FileImageSource::with_base_dir(dir.path());
        assert_eq!(source.fetch("foto.jpg").unwrap(), b"bytes");

        let absolute = dir.path().join("foto.jpg");
        let uri = format!("file://{}", absolute.display());
        assert_eq!(FileImageSource::new().fetch(&uri).unwrap(), b"bytes");
    }

    #[test]
    fn test_file_source_errors() {
        let source = FileImageSource::new();
        assert!(matches!(
            source.fetch("/definitely/not/here.jpg"),
            Err(ReportError::ImageLoad { .. })
        ));
        assert!(matches!(
            source.fetch("content://media/external/images/1"),
            Err(ReportError::ImageLoad { .. })
        ));
    }

    #[test]
    fn test_memory_source() {
        let source = MemoryImageSource::new().with("a", vec![1, 2, 3]);
        assert_eq!(source.fetch("a").unwrap(), vec![1, 2, 3]);
        assert!(source.fetch("b").is_err());
    }
}
