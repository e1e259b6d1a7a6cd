//! Integration tests for ingest crate

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use scorm_errors::{Error, PackageError};
    use scorm_events::{AppEvent, PackageEvent};
    use scorm_ingest::*;
    use scorm_store::{ContentStore, LocalStore, MemoryStore, StorageLayout};
    use scorm_types::{BlockLocation, ScormVersion};
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use zip::write::SimpleFileOptions;

    const MANIFEST: &str = r#"<?xml version="1.0"?>
<manifest xmlns="http://www.imsglobal.org/xsd/imscp_v1p1">
  <metadata><schemaversion>2004 3rd Edition</schemaversion></metadata>
  <resources><resource identifier="r1" href="content/index.html"/></resources>
</manifest>"#;

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in files {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(bytes).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    fn sample_package() -> Vec<u8> {
        build_zip(&[
            ("imsmanifest.xml", MANIFEST.as_bytes()),
            ("content/", b""),
            ("content/index.html", b"<html>hello</html>"),
            ("content/app.js", b"console.log(1)"),
        ])
    }

    fn block() -> BlockLocation {
        BlockLocation::new("org", "course", "scorm", "b1")
    }

    fn ingestor(store: &MemoryStore) -> PackageIngestor {
        PackageIngestor::new(Arc::new(store.clone()), StorageLayout::default())
    }

    fn assert_invalid_package(result: &Result<scorm_types::IngestedPackage, Error>) {
        assert!(
            matches!(
                result,
                Err(Error::Package(PackageError::InvalidPackage { .. }))
            ),
            "expected InvalidPackage, got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_ingest_package() {
        let store = MemoryStore::new();
        let archive = sample_package();
        let expected_hash = blake3::hash(&archive).to_hex().to_string();

        let package = ingestor(&store)
            .ingest(&block(), archive.clone(), "course.zip")
            .await
            .unwrap();

        assert_eq!(package.metadata.content_hash, expected_hash);
        assert_eq!(package.metadata.original_name, "course.zip");
        assert_eq!(package.metadata.size_bytes, archive.len() as u64);
        assert_eq!(package.descriptor.scorm_version, ScormVersion::Scorm2004);
        assert_eq!(package.descriptor.entry_page_path, "content/index.html");

        let root = format!("scorm/b1/{expected_hash}");
        assert_eq!(
            store
                .read(&format!("{root}/content/index.html"))
                .await
                .unwrap(),
            b"<html>hello</html>"
        );
        assert!(store.exists(&format!("{root}/content/app.js")).await.unwrap());
        assert!(store.exists(&format!("{root}/imsmanifest.xml")).await.unwrap());

        let package_key = format!("org/course/scorm/b1/{expected_hash}.zip");
        assert_eq!(store.read(&package_key).await.unwrap(), archive);
    }

    #[tokio::test]
    async fn test_missing_manifest_keeps_assets() {
        let store = MemoryStore::new();
        let archive = build_zip(&[("index.html", b"<html/>")]);
        let hash = blake3::hash(&archive).to_hex().to_string();

        let result = ingestor(&store).ingest(&block(), archive, "course.zip").await;
        match result {
            Err(Error::Package(PackageError::InvalidPackage { message })) => {
                assert_eq!(
                    message,
                    "could not find 'imsmanifest.xml' file at the root of the zip file"
                );
            }
            other => panic!("expected InvalidPackage, got {other:?}"),
        }

        assert!(store
            .exists(&format!("scorm/b1/{hash}/index.html"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_nested_manifest_is_not_found() {
        let store = MemoryStore::new();
        let archive = build_zip(&[
            ("course/imsmanifest.xml", MANIFEST.as_bytes()),
            ("course/index.html", b"<html/>"),
        ]);

        let result = ingestor(&store).ingest(&block(), archive, "course.zip").await;
        assert_invalid_package(&result);
    }

    #[tokio::test]
    async fn test_not_a_zip() {
        let store = MemoryStore::new();
        let result = ingestor(&store)
            .ingest(&block(), b"definitely not a zip".to_vec(), "notes.txt")
            .await;
        assert_invalid_package(&result);

        // The raw upload is stored before the container is read
        let hash = blake3::hash(b"definitely not a zip").to_hex().to_string();
        assert_eq!(store.keys(), vec![format!("org/course/scorm/b1/{hash}.txt")]);
    }

    #[tokio::test]
    async fn test_unsafe_entry_path_is_rejected() {
        let store = MemoryStore::new();
        let archive = build_zip(&[
            ("imsmanifest.xml", MANIFEST.as_bytes()),
            ("../escape.html", b"<html/>"),
        ]);

        let result = ingestor(&store).ingest(&block(), archive, "course.zip").await;
        assert_invalid_package(&result);
        assert!(store.keys().iter().all(|k| !k.contains("escape")));
    }

    #[tokio::test]
    async fn test_malformed_manifest() {
        let store = MemoryStore::new();
        let archive = build_zip(&[("imsmanifest.xml", b"<manifest><resources>")]);

        let result = ingestor(&store).ingest(&block(), archive, "course.zip").await;
        assert!(matches!(
            result,
            Err(Error::Package(PackageError::InvalidManifest { .. }))
        ));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let store = MemoryStore::new();
        let archive = sample_package();
        let ingestor = ingestor(&store).with_options(IngestOptions {
            extract_concurrency: 2,
            max_archive_bytes: Some(16),
            ..IngestOptions::default()
        });

        let result = ingestor.ingest(&block(), archive, "course.zip").await;
        assert_invalid_package(&result);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_expanded_size_limit() {
        let store = MemoryStore::new();
        let filler = vec![0u8; 256 * 1024];
        let archive = build_zip(&[
            ("imsmanifest.xml", MANIFEST.as_bytes()),
            ("content/index.html", b"<html/>"),
            ("content/filler.bin", filler.as_slice()),
        ]);
        assert!(archive.len() < 16 * 1024);

        let ingestor = ingestor(&store).with_options(IngestOptions {
            max_archive_bytes: Some(16 * 1024),
            max_extracted_bytes: 64 * 1024,
            ..IngestOptions::default()
        });
        let hash = blake3::hash(&archive).to_hex().to_string();
        let result = ingestor.ingest(&block(), archive, "filler.zip").await;
        match &result {
            Err(Error::Package(PackageError::InvalidPackage { message })) => {
                assert_eq!(message, "archive expands to more than 65536 bytes");
            }
            other => panic!("expected InvalidPackage, got {other:?}"),
        }

        // Only the raw archive was stored; no entry was extracted
        assert_eq!(store.keys(), vec![format!("org/course/scorm/b1/{hash}.zip")]);
    }

    #[tokio::test]
    async fn test_same_archive_twice_shares_hash() {
        let store = MemoryStore::new();
        let ingestor = ingestor(&store);

        let first = ingestor
            .ingest(&block(), sample_package(), "a.zip")
            .await
            .unwrap();
        let keys_after_first = store.len();
        let second = ingestor
            .ingest(&block(), sample_package(), "a.zip")
            .await
            .unwrap();

        assert_eq!(first.metadata.content_hash, second.metadata.content_hash);
        assert_eq!(store.len(), keys_after_first);
    }

    #[tokio::test]
    async fn test_new_version_keeps_old_assets() {
        let store = MemoryStore::new();
        let ingestor = ingestor(&store);

        let old = ingestor
            .ingest(&block(), sample_package(), "v1.zip")
            .await
            .unwrap();
        let updated = build_zip(&[
            ("imsmanifest.xml", MANIFEST.as_bytes()),
            ("content/index.html", b"<html>v2</html>"),
        ]);
        let new = ingestor.ingest(&block(), updated, "v2.zip").await.unwrap();

        assert_ne!(old.metadata.content_hash, new.metadata.content_hash);
        let layout = ingestor.layout();
        let old_page = layout.asset_path("b1", &old.metadata.content_hash, "content/index.html");
        let new_page = layout.asset_path("b1", &new.metadata.content_hash, "content/index.html");
        assert_eq!(store.read(&old_page).await.unwrap(), b"<html>hello</html>");
        assert_eq!(store.read(&new_page).await.unwrap(), b"<html>v2</html>");
    }

    #[tokio::test]
    async fn test_events_are_emitted() {
        let store = MemoryStore::new();
        let (tx, mut rx) = scorm_events::channel();
        let ingestor = ingestor(&store).with_event_sender(tx);

        ingestor
            .ingest(&block(), sample_package(), "course.zip")
            .await
            .unwrap();
        drop(ingestor);

        let mut events = Vec::new();
        while let Some(message) = rx.recv().await {
            assert_eq!(message.meta.correlation_id.as_deref(), Some("b1"));
            events.push(message.event);
        }

        assert!(matches!(
            events.first(),
            Some(AppEvent::Package(PackageEvent::IngestStarted { .. }))
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Package(PackageEvent::EntriesExtracted { count: 3, .. })
        )));
        assert!(matches!(
            events.last(),
            Some(AppEvent::Package(PackageEvent::IngestCompleted { .. }))
        ));
    }

    #[tokio::test]
    async fn test_rejection_event() {
        let store = MemoryStore::new();
        let (tx, mut rx) = scorm_events::channel();
        let ingestor = ingestor(&store).with_event_sender(tx);

        let _ = ingestor
            .ingest(&block(), b"nope".to_vec(), "nope.zip")
            .await;
        drop(ingestor);

        let mut last = None;
        while let Some(message) = rx.recv().await {
            last = Some(message.event);
        }
        assert!(matches!(
            last,
            Some(AppEvent::Package(PackageEvent::IngestRejected { .. }))
        ));
    }

    #[tokio::test]
    async fn test_ingest_into_local_store() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp.path());
        let ingestor = PackageIngestor::new(Arc::new(store), StorageLayout::new("assets"));

        let package = ingestor
            .ingest(&block(), sample_package(), "course.zip")
            .await
            .unwrap();

        let page = temp
            .path()
            .join("assets/b1")
            .join(&package.metadata.content_hash)
            .join("content/index.html");
        assert_eq!(std::fs::read(page).unwrap(), b"<html>hello</html>");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_fingerprint_is_deterministic(body in proptest::collection::vec(any::<u8>(), 0..512)) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let archive = build_zip(&[
                ("imsmanifest.xml", MANIFEST.as_bytes()),
                ("content/index.html", &body),
            ]);

            let (first, second) = runtime.block_on(async {
                let a = ingestor(&MemoryStore::new())
                    .ingest(&block(), archive.clone(), "a.zip")
                    .await
                    .unwrap();
                let b = ingestor(&MemoryStore::new())
                    .ingest(&block(), archive.clone(), "b.zip")
                    .await
                    .unwrap();
                (a, b)
            });

            prop_assert_eq!(&first.metadata.content_hash, &second.metadata.content_hash);
            let expected = blake3::hash(&archive).to_hex().to_string();
            prop_assert_eq!(first.metadata.content_hash, expected);
        }
    }
}
