//! Error taxonomy shared by the record store and consent registry.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid input: {field} must be non-empty")]
    InvalidInput { field: &'static str },

    #[error("invalid duration: {seconds}s (grant duration must be positive)")]
    InvalidDuration { seconds: i64 },

    /// Reserved for storage-backed implementations that distinguish a
    /// missing entry from an empty result. The in-memory core treats
    /// both as empty values and never returns this.
    #[error("not found: {what}")]
    NotFound { what: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Rejects empty (or whitespace-only) identifiers.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidInput { field });
    }
    Ok(())
}
