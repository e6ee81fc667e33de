//! Whole-library persistence

use crate::codec::{handler_for, Codec};
use crate::config::{FileFormat, StorageConfig};
use crate::error::{Result, StorageError};
use melody_core::Library;
use std::path::{Path, PathBuf};
use tracing::info;

/// Saves a [`Library`] to one artifact and loads it back
///
/// Every entity is written as a tagged `{type, data}` record, so the artifact
/// can be reloaded without knowing entity kinds up front.
pub struct LibraryStore {
    path: PathBuf,
    codec: Box<dyn Codec>,
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat, config: &StorageConfig) -> Self {
        Self {
            path: path.into(),
            codec: handler_for(format, config),
        }
    }

    /// Store whose format is taken from the file extension, falling back to
    /// the configured default format
    pub fn open(path: impl Into<PathBuf>, config: &StorageConfig) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path).unwrap_or(config.format);
        Self::new(path, format, config)
    }

    /// Store using the process-wide configuration
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self::open(path, StorageConfig::global())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.codec.format()
    }

    pub fn save(&self, library: &Library) -> Result<()> {
        self.codec.save_trees_file(&library.to_trees(), &self.path)?;
        info!(path = %self.path.display(), entities = library.len(), "Saved library");
        Ok(())
    }

    /// Load the library, dropping records that cannot be resolved
    pub fn load(&self) -> Result<Library> {
        let trees = self.codec.load_file(&self.path)?;
        let library = Library::from_trees(&trees);

        if library.len() < trees.len() {
            info!(
                path = %self.path.display(),
                dropped = trees.len() - library.len(),
                "Some library records were not loaded"
            );
        }
        Ok(library)
    }

    /// Load the library, failing on the first unresolvable record
    pub fn load_strict(&self) -> Result<Library> {
        let trees = self.codec.load_file(&self.path)?;
        Library::try_from_trees(&trees).map_err(StorageError::from)
    }
}

impl std::fmt::Debug for LibraryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryStore")
            .field("path", &self.path)
            .field("format", &self.codec.format())
            .finish()
    }
}
