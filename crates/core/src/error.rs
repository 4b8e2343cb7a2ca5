use thiserror::Error;

/// Recoverable failures surfaced to the form or panel that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Input failed validation; the caller keeps the input for correction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A built-in preset was targeted by a delete or modify operation.
    #[error("Preset '{0}' is built-in and cannot be changed")]
    ProtectedPreset(String),

    #[error("Preset '{0}' not found")]
    PresetNotFound(String),
}

pub type DeckResult<T> = std::result::Result<T, DeckError>;
