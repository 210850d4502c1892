//! Error types for preference storage operations
//!
//! Almost every read path in this crate is total: missing keys resolve to
//! defaults and store failures are logged. The errors below surface only where
//! a caller asked for something that cannot be honoured, such as deleting a key
//! that was never stored or importing a malformed XML document.

use std::path::PathBuf;

/// Errors that can occur while reading, writing or transferring preferences
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing store rejected an operation
    #[error("Backing store error: {0}")]
    BackingStore(String),

    /// A key was addressed that the store does not hold
    #[error("Unknown preference key: {0}")]
    NoSuchKey(String),

    /// Importing a preference subtree failed
    #[error("Could not import preferences from {path}: {message}")]
    Import { path: PathBuf, message: String },

    /// Exporting a preference subtree failed
    #[error("Could not export preferences to {path}: {message}")]
    Export { path: PathBuf, message: String },

    /// The XML subtree document is malformed
    #[error("Invalid preferences document: {0}")]
    InvalidFormat(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encrypting or decrypting a credential failed
    #[error("Credential cipher error: {0}")]
    Cipher(String),

    /// A stored custom format record could not be decoded
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use jabprefs::{MemoryStore, Result, TypedStore, DefaultTable};
/// use std::sync::Arc;
///
/// fn drop_key(store: &TypedStore, key: &str) -> Result<()> {
///     store.delete_key(key)?;
///     Ok(())
/// }
///
/// let store = TypedStore::new(Arc::new(MemoryStore::new()), DefaultTable::standard());
/// store.put_string("defaultOwner", "alice");
/// drop_key(&store, "defaultOwner")?;
/// assert!(drop_key(&store, "defaultOwner").is_err());
/// # Ok::<(), jabprefs::Error>(())
/// ```
pub type Result<T> = std::result::Result<T, Error>;
