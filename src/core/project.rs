//! Inventory discovery and layout
//!
//! An inventory is any directory containing a `.ficelle/` folder, which holds
//! `config.yaml` and the `inventory.db` SQLite file.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::store::{SqliteStore, StoreError};

/// Name of the inventory metadata directory
pub const INVENTORY_DIR: &str = ".ficelle";

/// Database file inside [`INVENTORY_DIR`]
const DB_FILE: &str = "inventory.db";

/// Represents an inventory on disk
#[derive(Debug)]
pub struct Project {
    /// Root directory (parent of .ficelle/)
    root: PathBuf,
}

impl Project {
    /// Find the inventory by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Use an explicit root if given, otherwise discover from the current directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Find the inventory by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(INVENTORY_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new inventory at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if root.join(INVENTORY_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }
        Self::create(root)
    }

    /// Initialize even if .ficelle/ exists; an existing config and data are kept
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create(root)
    }

    fn create(root: PathBuf) -> Result<Self, ProjectError> {
        let dir = root.join(INVENTORY_DIR);
        std::fs::create_dir_all(&dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        let config_path = dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        let project = Self { root };
        project.open_store()?;
        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# Ficelle inventory configuration

# Hourly rate used by `ficelle price` when --rate is not given
# hourly_rate: 15.0

# Default margin (%) used by `ficelle price`
# margin_pct: 20.0

# Currency symbol used in reports
# currency: "€"

# Low-stock alert: below this many meters...
# low_stock_absolute: 5.0
# ...or below this fraction of the initial length
# low_stock_ratio: 0.15

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    /// Get the inventory root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .ficelle directory
    pub fn inventory_dir(&self) -> PathBuf {
        self.root.join(INVENTORY_DIR)
    }

    /// Path of the SQLite database
    pub fn db_path(&self) -> PathBuf {
        self.inventory_dir().join(DB_FILE)
    }

    /// Open the inventory database (one connection per command)
    pub fn open_store(&self) -> Result<SqliteStore, StoreError> {
        SqliteStore::open(&self.db_path())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a ficelle inventory (searched from {searched_from:?}). Run 'ficelle init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("ficelle inventory already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
