//! Serving extracted assets back to the browser

use crate::{ContentStore, StorageLayout};
use scorm_errors::Error;

/// Content type used when the extension says nothing
pub const DEFAULT_MIME: &str = "text/html";

/// Bytes of a proxied asset with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedContent {
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Content type for a file name, from its extension
#[must_use]
pub fn guess_mime(path: &str) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME)
        .to_string()
}

impl ProxiedContent {
    /// Load an asset of `block_id`, from the hashed layout when a hash is given.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::PathNotFound` when no such asset exists, or any
    /// other storage error from the backend.
    pub async fn fetch(
        store: &dyn ContentStore,
        layout: &StorageLayout,
        block_id: &str,
        content_hash: Option<&str>,
        relative: &str,
    ) -> Result<Self, Error> {
        let key = layout.resolve(block_id, content_hash, relative);
        let body = store.read(&key).await?;
        tracing::debug!(%key, size = body.len(), "proxying asset");
        Ok(Self {
            content_type: guess_mime(relative),
            key,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("index.html"), "text/html");
        assert_eq!(guess_mime("styles/site.css"), "text/css");
        assert_eq!(guess_mime("img/logo.png"), "image/png");
        assert_eq!(guess_mime("no_extension"), DEFAULT_MIME);
        assert_eq!(guess_mime("data.unknownext"), DEFAULT_MIME);
    }
}
