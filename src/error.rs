//! Error types for keytrie

use thiserror::Error;

/// Result type alias for trie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serializing or deserializing a trie
///
/// Construction, matching and enumeration never fail; only the codecs
/// produce errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corruption detected: {0}")]
    Corruption(String),
}
