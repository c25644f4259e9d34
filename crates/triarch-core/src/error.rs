//! Error types for triarch-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A machine language name was not recognized.
    #[error("unknown machine language: {0}")]
    UnknownLanguage(String),
}
