//! Screenshot artifact storage
//!
//! This module provides a thread-safe manager for the directory that holds
//! per-attempt screenshots. Every attempt of a search produces its own file,
//! named `{queryBaseName}_screenshot_{attemptIndex}.png`, so successive
//! attempts never overwrite each other and the evidence survives for
//! post-hoc debugging. The store is append-only: files are tracked but
//! never deleted.
//!
//! # Examples
//!
//! ```
//! use image_locator::util::store::ScreenshotStore;
//!
//! let dir = std::env::temp_dir().join("image-locator-doc");
//! let store = ScreenshotStore::new(&dir);
//!
//! let path = store.screenshot_path("login_button", 0).unwrap();
//! assert!(path.ends_with("login_button_screenshot_0.png"));
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};

use crate::error::{LocatorError, LocatorResult};

/// A screenshot artifact recorded by the store
#[derive(Debug, Clone)]
pub struct ScreenshotRecord {
    /// Path to the screenshot file
    pub path:      PathBuf,
    /// Timestamp when the attempt produced the file
    pub timestamp: DateTime<Utc>,
}

/// Thread-safe manager for the screenshots directory
///
/// Tracks every artifact produced by the locator so a test report can
/// enumerate the evidence afterwards. Unlike a temp-file manager there is
/// no cleanup on drop: screenshots are the debugging record of a search
/// and outlive the store.
#[derive(Clone, Debug)]
pub struct ScreenshotStore {
    root:  PathBuf,
    files: Arc<Mutex<Vec<ScreenshotRecord>>>,
}

impl ScreenshotStore {
    /// Creates a store rooted at `root` (e.g., `reports/screenshots`)
    ///
    /// The directory is created lazily on first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:  root.into(),
            files: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The directory that holds the screenshot artifacts
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensures the screenshots directory exists, creating it if necessary
    fn ensure_root(&self) -> LocatorResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LocatorError::IoError)?;
        }
        Ok(())
    }

    /// Returns the artifact path for one attempt of a search
    ///
    /// The filename contract is `{queryBaseName}_screenshot_{attemptIndex}.png`;
    /// the attempt index keeps intermediate screenshots distinct.
    pub fn screenshot_path(&self, query_name: &str, attempt: u32) -> LocatorResult<PathBuf> {
        self.ensure_root()?;
        Ok(self
            .root
            .join(format!("{query_name}_screenshot_{attempt}.png")))
    }

    /// Records a produced artifact with the current timestamp
    pub fn record(&self, path: PathBuf) {
        let record = ScreenshotRecord {
            path,
            timestamp: Utc::now(),
        };
        self.files
            .lock()
            .expect("screenshot record lock poisoned")
            .push(record);
    }

    /// Snapshot of every artifact recorded so far
    pub fn records(&self) -> Vec<ScreenshotRecord> {
        self.files
            .lock()
            .expect("screenshot record lock poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ScreenshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(dir.path().join("screenshots"));
        (dir, store)
    }

    #[test]
    fn test_screenshot_path_naming_contract() {
        let (_dir, store) = temp_store();

        let p0 = store.screenshot_path("login_button", 0).unwrap();
        let p1 = store.screenshot_path("login_button", 1).unwrap();

        assert!(p0.ends_with("login_button_screenshot_0.png"));
        assert!(p1.ends_with("login_button_screenshot_1.png"));
        assert_ne!(p0, p1, "attempt index must keep artifacts distinct");
    }

    #[test]
    fn test_root_created_lazily() {
        let (_dir, store) = temp_store();
        assert!(!store.root().exists());

        store.screenshot_path("spinner", 0).unwrap();
        assert!(store.root().exists());
    }

    #[test]
    fn test_records_are_append_only() {
        let (_dir, store) = temp_store();

        store.record(PathBuf::from("a_screenshot_0.png"));
        store.record(PathBuf::from("a_screenshot_1.png"));

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].path.ends_with("a_screenshot_0.png"));
        assert!(records[1].timestamp >= records[0].timestamp);
    }

    #[test]
    fn test_clone_shares_record_list() {
        let (_dir, store) = temp_store();
        let clone = store.clone();

        store.record(PathBuf::from("b_screenshot_0.png"));
        assert_eq!(clone.records().len(), 1);
    }
}
