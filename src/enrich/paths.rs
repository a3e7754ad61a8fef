//! Typed paths into the output layout.
//!
//! Per-record artifacts are namespaced by the record's 1-based position in the
//! filtered sequence, so two records never share a directory.
use super::OUTPUT_TABLE_FILE;
use std::path::PathBuf;

/// Convenience wrapper for locating run artifacts.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    root: PathBuf,
}

impl OutputPaths {
    /// Create a new path helper rooted at the output directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the `images/` directory path.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Return the `images/<row>/image.jpg` path.
    pub fn image_path(&self, row: usize) -> PathBuf {
        self.images_dir().join(row.to_string()).join("image.jpg")
    }

    /// Return the `jsons/` directory path.
    pub fn jsons_dir(&self) -> PathBuf {
        self.root.join("jsons")
    }

    /// Return the `jsons/<row>/details.json` path.
    pub fn details_path(&self, row: usize) -> PathBuf {
        self.jsons_dir().join(row.to_string()).join("details.json")
    }

    /// Return the annotated output table path.
    pub fn table_path(&self) -> PathBuf {
        self.root.join(OUTPUT_TABLE_FILE)
    }
}
