//! Error types shared across the workspace.

use thiserror::Error;

/// Configuration problems detected when a localization service is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured default language is not known to the language
    /// service.
    #[error("default language `{0}` is not known to the language service")]
    UnknownDefaultLanguage(String),

    /// The configured culture identifier is empty.
    #[error("culture identifier is empty")]
    EmptyCulture,
}

/// Failures raised by a [`TranslationStore`](crate::store::TranslationStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be understood.
    #[error("malformed row in collection `{collection}`: {message}")]
    Malformed {
        /// Collection the row belongs to.
        collection: String,
        /// Human-readable description of the problem.
        message: String,
    },
}
