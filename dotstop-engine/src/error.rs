//! Engine error types

use dotstop_trie::TrieError;
use thiserror::Error;

/// Errors raised while building filters or loading exception lists
#[derive(Error, Debug)]
pub enum EngineError {
    /// Trie construction failed
    #[error("trie error: {0}")]
    Trie(#[from] TrieError),

    /// Configuration file could not be read or parsed
    #[error("configuration error in {path}: {reason}")]
    Config {
        /// The configuration file path
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Configuration content is invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No exception list for the language
    #[error("language '{code}' not supported")]
    UnsupportedLanguage {
        /// The language code that is not supported
        code: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
