//! Error types for control structure extraction

use std::path::PathBuf;

use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Extraction errors
///
/// Only fatal conditions live here. A missing diagram, an unresolved edge
/// endpoint or an unknown element type are ordinary outcomes and are
/// represented with `Option` values instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Project file not found: {}", path.display())]
    ProjectFileNotFound { path: PathBuf },

    #[error("Invalid project directory: {}", .0.display())]
    InvalidProjectDir(PathBuf),

    #[error("Failed to parse {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Missing required plugin(s): {}", .0.join(", "))]
    MissingPlugins(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
