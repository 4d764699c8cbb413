//! Error taxonomy for the theme store

use thiserror::Error;

/// Theme store error types
#[derive(Debug, Error)]
pub enum ThemeStoreError {
    /// Submitted payload failed validation (rejected, not silently corrected)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate theme name within an owner's namespace
    #[error("Theme name already exists: {0}")]
    Conflict(String),

    /// Theme does not exist for the resolved owner
    #[error("Theme not found: {0}")]
    NotFound(String),

    /// The demotion or successor-promotion step failed after the primary
    /// write succeeded; the operation as a whole is failed
    #[error("Default-theme invariant repair failed: {0}")]
    InvariantRepair(String),

    /// SQLx error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for theme store operations
pub type Result<T> = std::result::Result<T, ThemeStoreError>;
