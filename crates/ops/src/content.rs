//! Content proxy and package URLs

use crate::{OpsCtx, ProxyResponse};
use scorm_errors::Error;
use scorm_store::{ProxiedContent, StorageLayout};
use scorm_types::BlockSettings;

/// Proxy URL of a block's entry page
///
/// Empty when no package was ingested. Records from before content
/// addressing use the `v0` route, everything else `v1` with the hash.
#[must_use]
pub fn live_url(settings: &BlockSettings, route_prefix: &str) -> String {
    let Some(meta) = &settings.package_meta else {
        return String::new();
    };
    let prefix = route_prefix.trim_end_matches('/');
    if settings.legacy_scorm_file.is_some() {
        format!(
            "{prefix}/v0/{}/{}",
            settings.block_id(),
            settings.path_index_page
        )
    } else {
        format!(
            "{prefix}/v1/{}/{}/{}",
            settings.block_id(),
            meta.content_hash,
            settings.path_index_page
        )
    }
}

/// Store key of the raw uploaded archive, for offline clients
#[must_use]
pub fn package_download_path(settings: &BlockSettings) -> Option<String> {
    if let Some(legacy) = &settings.legacy_scorm_file {
        return Some(legacy.clone());
    }
    settings.package_meta.as_ref().map(|meta| {
        StorageLayout::package_path(&settings.location, &meta.content_hash, meta.extension())
    })
}

/// Serve one extracted asset
///
/// `content_hash` selects the content-addressed layout; without it the
/// legacy per-block layout is used.
///
/// # Errors
///
/// Returns `StorageError::PathNotFound` when the asset does not exist and
/// other storage errors from the backend.
pub async fn proxy_media(
    ctx: &OpsCtx,
    block_id: &str,
    content_hash: Option<&str>,
    file: &str,
) -> Result<ProxyResponse, Error> {
    let content =
        ProxiedContent::fetch(ctx.store.as_ref(), ctx.layout(), block_id, content_hash, file)
            .await?;
    Ok(ProxyResponse {
        content_type: content.content_type,
        size: content.body.len(),
        body: content.body,
    })
}
