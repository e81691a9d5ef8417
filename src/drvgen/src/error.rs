// wrfsuewsrs-drvgen/src/error.rs

//! Error types for driver-source generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driver-generation operations.
pub type Result<T> = std::result::Result<T, DrvGenError>;

#[derive(Error, Debug)]
pub enum DrvGenError {
    /// The SUEWS tree carries no dependency manifest at the expected location.
    #[error("Dependency manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// A manifest-listed or fixed-dependency source file is missing on disk.
    #[error("Source file not found: {}", .0.display())]
    SourceFileNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
