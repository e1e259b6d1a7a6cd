//! Integration tests for store

#[cfg(test)]
mod tests {
    use scorm_errors::{Error, StorageError};
    use scorm_store::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.write("scorm/b/h/a.js", b"let x = 1;").await.unwrap();
        assert!(store.exists("scorm/b/h/a.js").await.unwrap());
        assert_eq!(store.read("scorm/b/h/a.js").await.unwrap(), b"let x = 1;");
        assert_eq!(store.keys(), vec!["scorm/b/h/a.js".to_string()]);
    }

    #[tokio::test]
    async fn test_proxy_current_and_legacy_layouts() {
        let store = MemoryStore::new();
        let layout = StorageLayout::default();
        store
            .write("scorm/b1/feed/index.html", b"<p>new</p>")
            .await
            .unwrap();
        store
            .write("scorm/b1/index.html", b"<p>old</p>")
            .await
            .unwrap();

        let current = ProxiedContent::fetch(&store, &layout, "b1", Some("feed"), "index.html")
            .await
            .unwrap();
        assert_eq!(current.body, b"<p>new</p>");
        assert_eq!(current.content_type, "text/html");
        assert_eq!(current.key, "scorm/b1/feed/index.html");

        let legacy = ProxiedContent::fetch(&store, &layout, "b1", None, "index.html")
            .await
            .unwrap();
        assert_eq!(legacy.body, b"<p>old</p>");
    }

    #[tokio::test]
    async fn test_proxy_missing_asset() {
        let store = MemoryStore::new();
        let err = ProxiedContent::fetch(
            &store,
            &StorageLayout::default(),
            "b1",
            Some("feed"),
            "gone.css",
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::PathNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_stores_are_object_safe() {
        let dir = tempfile::tempdir().unwrap();
        let stores: Vec<Arc<dyn ContentStore>> = vec![
            Arc::new(MemoryStore::new()),
            Arc::new(LocalStore::new(dir.path())),
        ];
        for store in stores {
            store.write("k/v.txt", b"same").await.unwrap();
            assert_eq!(store.read("k/v.txt").await.unwrap(), b"same");
        }
    }
}
