#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content storage for SCORM packages
//!
//! Objects are addressed by opaque `/`-separated keys. The crate also owns
//! the key layout used for raw archives and extracted assets, and resolves
//! content proxy requests onto that layout.

mod layout;
mod local;
mod memory;
mod proxy;

pub use layout::StorageLayout;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use proxy::{guess_mime, ProxiedContent, DEFAULT_MIME};

use async_trait::async_trait;
use scorm_errors::{Error, StorageError};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Readable handle returned by [`ContentStore::open`]
pub type ContentReader = Box<dyn AsyncRead + Send + Unpin>;

/// Durable key-addressed blob storage
///
/// Implementations perform no retries; every backend fault surfaces as a
/// [`StorageError`].
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous object
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), Error>;

    /// Open an object for streaming reads.
    ///
    /// A missing object is `StorageError::PathNotFound`.
    async fn open(&self, key: &str) -> Result<ContentReader, Error>;

    async fn exists(&self, key: &str) -> Result<bool, Error>;

    /// Read a whole object into memory
    async fn read(&self, key: &str) -> Result<Vec<u8>, Error> {
        let mut reader = self.open(key).await?;
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, key))?;
        Ok(bytes)
    }
}

/// Check that a key stays inside the store
///
/// Keys are relative, `/`-separated and may not contain empty, `.` or `..`
/// segments, backslashes or NUL bytes.
///
/// # Errors
///
/// Returns `StorageError::InvalidPath` for keys that fail the check.
pub fn validate_key(key: &str) -> Result<(), Error> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidPath {
            path: key.to_string(),
        }
        .into());
    }
    Ok(())
}
