//! Run configuration.
//!
//! Everything a single organize pass needs is gathered here once, before any
//! folder is created: the canonical target root, the executable to leave
//! alone, the category folders in creation order, and the extension index.
//! There is no configuration file; the category table is compiled in and can
//! only be swapped out programmatically.

use crate::file_category::{CategoryError, CategoryTable, ExtensionIndex};
use std::path::{Path, PathBuf};

/// Immutable settings for one organize pass.
#[derive(Debug, Clone)]
pub struct RunConfig {
    root: PathBuf,
    self_path: Option<PathBuf>,
    category_names: Vec<String>,
    index: ExtensionIndex,
}

impl RunConfig {
    /// Builds the configuration for `root` from a category table.
    ///
    /// `root` is expected to be canonical already (see
    /// [`crate::path_resolver`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the table declares the same extension twice.
    pub fn new(
        root: PathBuf,
        self_path: Option<PathBuf>,
        table: &CategoryTable,
    ) -> Result<Self, CategoryError> {
        let index = table.build_index()?;
        Ok(Self {
            root,
            self_path,
            category_names: table.names().map(str::to_string).collect(),
            index,
        })
    }

    /// Configuration using the built-in category table.
    pub fn standard(root: PathBuf, self_path: Option<PathBuf>) -> Result<Self, CategoryError> {
        Self::new(root, self_path, &CategoryTable::standard())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn self_path(&self) -> Option<&Path> {
        self.self_path.as_deref()
    }

    pub fn category_names(&self) -> &[String] {
        &self.category_names
    }

    pub fn index(&self) -> &ExtensionIndex {
        &self.index
    }

    /// Returns true if `canonical` is the running executable.
    pub fn is_self(&self, canonical: &Path) -> bool {
        self.self_path.as_deref() == Some(canonical)
    }
}
