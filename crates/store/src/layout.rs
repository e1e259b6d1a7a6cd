//! Key layout for raw archives and extracted assets

use scorm_types::BlockLocation;

/// Maps blocks and content hashes onto store keys
///
/// Extracted assets live under `<location>/<block_id>/<content_hash>/`, so a
/// new upload never overwrites assets that running sessions still load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    location: String,
}

impl StorageLayout {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into().trim_matches('/').to_string(),
        }
    }

    /// Root namespace for extracted assets
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Key of the uploaded archive, kept for download
    #[must_use]
    pub fn package_path(block: &BlockLocation, content_hash: &str, extension: &str) -> String {
        format!(
            "{}/{}/{}/{}/{content_hash}{extension}",
            block.org, block.course, block.block_type, block.block_id
        )
    }

    /// Directory every entry of one package version is extracted under
    #[must_use]
    pub fn extract_root(&self, block_id: &str, content_hash: &str) -> String {
        format!("{}/{block_id}/{content_hash}", self.location)
    }

    #[must_use]
    pub fn asset_path(&self, block_id: &str, content_hash: &str, relative: &str) -> String {
        format!("{}/{relative}", self.extract_root(block_id, content_hash))
    }

    /// Asset key for records ingested before content addressing
    #[must_use]
    pub fn legacy_asset_path(&self, block_id: &str, relative: &str) -> String {
        format!("{}/{block_id}/{relative}", self.location)
    }

    /// Asset key for a proxy request, with or without a content hash
    #[must_use]
    pub fn resolve(&self, block_id: &str, content_hash: Option<&str>, relative: &str) -> String {
        match content_hash {
            Some(hash) => self.asset_path(block_id, hash, relative),
            None => self.legacy_asset_path(block_id, relative),
        }
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new("scorm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_path() {
        let block = BlockLocation::new("org", "course", "block_type", "block_id");
        assert_eq!(
            StorageLayout::package_path(&block, "sha1", ".html"),
            "org/course/block_type/block_id/sha1.html"
        );
    }

    #[test]
    fn test_asset_paths() {
        let layout = StorageLayout::default();
        assert_eq!(
            layout.asset_path("b1", "abcd", "content/index.html"),
            "scorm/b1/abcd/content/index.html"
        );
        assert_eq!(
            layout.resolve("b1", None, "index.html"),
            "scorm/b1/index.html"
        );
        assert_eq!(
            layout.resolve("b1", Some("abcd"), "index.html"),
            "scorm/b1/abcd/index.html"
        );
    }

    #[test]
    fn test_location_is_normalised() {
        let layout = StorageLayout::new("/assets/");
        assert_eq!(layout.location(), "assets");
        assert_eq!(layout.extract_root("b", "h"), "assets/b/h");
    }
}
