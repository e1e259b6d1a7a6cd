//! Zip container reading

use scorm_errors::{Error, PackageError};
use std::io::{Cursor, Read};
use std::path::{Component, Path};
use std::sync::Arc;
use tokio::task;

/// One regular file from the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path relative to the archive root
    pub path: String,
    pub bytes: Vec<u8>,
}

fn invalid(message: impl Into<String>) -> Error {
    PackageError::InvalidPackage {
        message: message.into(),
    }
    .into()
}

/// Normalised store-relative form of an entry path
fn entry_key(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Read every file entry of a zip archive.
///
/// Directory entries are skipped. Entries whose names would land outside
/// the extraction root reject the whole archive, as does a total
/// decompressed size above `max_extracted_bytes`. Sizes declared in entry
/// headers are checked up front and the actual output is capped while
/// reading.
///
/// # Errors
///
/// Returns `PackageError::InvalidPackage` if the bytes are not a readable
/// zip archive, contain an unsafe entry name or expand past the limit.
pub async fn read_entries(
    archive: Arc<[u8]>,
    max_extracted_bytes: u64,
) -> Result<Vec<ArchiveEntry>, Error> {
    task::spawn_blocking(move || -> Result<Vec<ArchiveEntry>, Error> {
        let mut zip = zip::ZipArchive::new(Cursor::new(&archive[..]))
            .map_err(|e| invalid(format!("not a valid zip archive: {e}")))?;

        let too_large =
            || invalid(format!("archive expands to more than {max_extracted_bytes} bytes"));

        let mut extracted: u64 = 0;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip
                .by_index(i)
                .map_err(|e| invalid(format!("failed to read zip entry: {e}")))?;

            if file.is_dir() {
                continue;
            }

            let path = file
                .enclosed_name()
                .as_deref()
                .and_then(entry_key)
                .ok_or_else(|| invalid(format!("unsafe entry path in archive: {}", file.name())))?;

            let remaining = max_extracted_bytes - extracted;
            if file.size() > remaining {
                return Err(too_large());
            }

            let mut bytes = Vec::new();
            (&mut file)
                .take(remaining.saturating_add(1))
                .read_to_end(&mut bytes)
                .map_err(|e| invalid(format!("failed to extract {path}: {e}")))?;
            let written = bytes.len() as u64;
            if written > remaining {
                return Err(too_large());
            }
            extracted += written;
            entries.push(ArchiveEntry { path, bytes });
        }

        Ok(entries)
    })
    .await
    .map_err(|e| Error::internal(format!("extraction task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use zip::write::SimpleFileOptions;

    fn zip_of(files: &[(&str, &[u8])]) -> Arc<[u8]> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in files {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(bytes).unwrap();
        }
        Arc::from(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn test_entry_key() {
        assert_eq!(
            entry_key(&PathBuf::from("a/b/c.html")).as_deref(),
            Some("a/b/c.html")
        );
        assert_eq!(entry_key(&PathBuf::from("./a.html")).as_deref(), Some("a.html"));
        assert_eq!(entry_key(&PathBuf::from("a/../b")), None);
        assert_eq!(entry_key(&PathBuf::from("/abs")), None);
        assert_eq!(entry_key(&PathBuf::from("")), None);
    }

    #[tokio::test]
    async fn test_not_a_zip() {
        let err = read_entries(Arc::from(&b"plain text"[..]), u64::MAX)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::InvalidPackage { .. })
        ));
    }

    #[tokio::test]
    async fn test_extracted_size_is_bounded() {
        let padding = vec![b'a'; 64 * 1024];
        let archive = zip_of(&[("a.html", &padding[..]), ("b.html", b"tail")]);
        assert!(archive.len() < padding.len() / 4);

        let err = read_entries(Arc::clone(&archive), 32 * 1024)
            .await
            .unwrap_err();
        match err {
            Error::Package(PackageError::InvalidPackage { message }) => {
                assert_eq!(message, "archive expands to more than 32768 bytes");
            }
            other => panic!("unexpected error {other:?}"),
        }

        // The limit is inclusive and counts every entry
        let exact = padding.len() as u64 + 4;
        assert_eq!(read_entries(Arc::clone(&archive), exact).await.unwrap().len(), 2);
        assert!(read_entries(archive, exact - 1).await.is_err());
    }
}
