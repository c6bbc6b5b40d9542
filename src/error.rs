//! Crate error type
//!
//! Searching and clearing never fail; errors only come from loading a page
//! (markup, missing content root) and from configuration.

/// Errors raised while setting up a page
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Strict-mode markup parse failure
    #[error("Markup error at byte {position}: {message}")]
    Markup { message: String, position: usize },

    /// No element carries the configured content root id
    #[error("Content root #{id} not found in page")]
    RootNotFound { id: String },

    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Malformed configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
