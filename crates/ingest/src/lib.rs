#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! SCORM package ingestion
//!
//! Turns an uploaded zip into stored, content-addressed assets plus the
//! metadata and descriptor the runtime needs:
//!
//! 1. fingerprint the archive bytes
//! 2. keep the original archive for download
//! 3. extract every entry under `<location>/<block_id>/<content_hash>/`
//! 4. read `imsmanifest.xml` back from the extracted tree
//!
//! Nothing written is rolled back when a later step fails.

mod archive;

pub use archive::{read_entries, ArchiveEntry};

use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use scorm_errors::{Error, PackageError, StorageError};
use scorm_events::{EventEmitter, EventSender, FailureContext, PackageEvent};
use scorm_hash::Hash;
use scorm_manifest::{Manifest, MANIFEST_FILE};
use scorm_store::{ContentStore, StorageLayout};
use scorm_types::{original_extension, BlockLocation, IngestedPackage, PackageMetadata};
use std::io::Cursor;
use std::sync::Arc;

/// Default ceiling on the total decompressed size of one package (1 GiB)
pub const DEFAULT_MAX_EXTRACTED_BYTES: u64 = 1 << 30;

/// Tuning knobs for ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Entries written to the store at once
    pub extract_concurrency: usize,
    /// Archives above this size are rejected before anything is stored
    pub max_archive_bytes: Option<u64>,
    /// Packages whose entries expand past this many bytes are rejected
    /// before any entry is written
    pub max_extracted_bytes: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            extract_concurrency: 4,
            max_archive_bytes: None,
            max_extracted_bytes: DEFAULT_MAX_EXTRACTED_BYTES,
        }
    }
}

/// Ingests packages into a content store
#[derive(Clone)]
pub struct PackageIngestor {
    store: Arc<dyn ContentStore>,
    layout: StorageLayout,
    options: IngestOptions,
    tx: Option<EventSender>,
}

impl EventEmitter for PackageIngestor {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl PackageIngestor {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, layout: StorageLayout) -> Self {
        Self {
            store,
            layout,
            options: IngestOptions::default(),
            tx: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: IngestOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Ingest an uploaded archive for `block`.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::InvalidPackage` when the upload is not a zip,
    /// is too large, has unsafe entry names or lacks a root
    /// `imsmanifest.xml`; `PackageError::InvalidManifest` when the manifest
    /// is malformed; storage errors from the content store otherwise.
    pub async fn ingest(
        &self,
        block: &BlockLocation,
        archive: Vec<u8>,
        original_name: &str,
    ) -> Result<IngestedPackage, Error> {
        self.emit_package(PackageEvent::IngestStarted {
            block_id: block.block_id.clone(),
            original_name: original_name.to_string(),
            size_bytes: archive.len() as u64,
        });

        match self.run(block, archive, original_name).await {
            Ok(package) => {
                self.emit_package(PackageEvent::IngestCompleted {
                    block_id: block.block_id.clone(),
                    content_hash: package.metadata.content_hash.clone(),
                    scorm_version: package.descriptor.scorm_version,
                    entry_page: package.descriptor.entry_page_path.clone(),
                });
                Ok(package)
            }
            Err(err) => {
                let failure = FailureContext::from_error(&err);
                let block_id = block.block_id.clone();
                if err.is_user_correctable() {
                    self.emit_package(PackageEvent::IngestRejected { block_id, failure });
                } else {
                    self.emit_package(PackageEvent::IngestFailed { block_id, failure });
                }
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        block: &BlockLocation,
        archive: Vec<u8>,
        original_name: &str,
    ) -> Result<IngestedPackage, Error> {
        let block_id = block.block_id.as_str();

        if let Some(limit) = self.options.max_archive_bytes {
            let size = archive.len() as u64;
            if size > limit {
                return Err(PackageError::InvalidPackage {
                    message: format!("archive is {size} bytes, the limit is {limit} bytes"),
                }
                .into());
            }
        }

        let (hash, size_bytes) = Hash::hash_reader(Cursor::new(&archive)).await?;
        let content_hash = hash.to_hex();
        self.emit_package(PackageEvent::Fingerprinted {
            block_id: block_id.to_string(),
            content_hash: content_hash.clone(),
        });

        let package_path = StorageLayout::package_path(
            block,
            &content_hash,
            original_extension(original_name),
        );
        self.store.write(&package_path, &archive).await?;
        self.emit_package(PackageEvent::ArchiveStored {
            block_id: block_id.to_string(),
            path: package_path,
        });

        let entries =
            read_entries(Arc::from(archive), self.options.max_extracted_bytes).await?;
        let count = entries.len();
        self.write_entries(block_id, &content_hash, entries).await?;
        self.emit_package(PackageEvent::EntriesExtracted {
            block_id: block_id.to_string(),
            content_hash: content_hash.clone(),
            count,
        });

        let manifest_key = self
            .layout
            .asset_path(block_id, &content_hash, MANIFEST_FILE);
        let manifest_bytes = match self.store.read(&manifest_key).await {
            Ok(bytes) => bytes,
            Err(Error::Storage(StorageError::PathNotFound { .. })) => {
                return Err(PackageError::missing_manifest().into());
            }
            Err(err) => return Err(err),
        };
        let descriptor = Manifest::parse(&manifest_bytes)?.into_descriptor();

        Ok(IngestedPackage {
            metadata: PackageMetadata {
                content_hash,
                original_name: original_name.to_string(),
                size_bytes,
                ingested_at: Utc::now(),
            },
            descriptor,
        })
    }

    async fn write_entries(
        &self,
        block_id: &str,
        content_hash: &str,
        entries: Vec<ArchiveEntry>,
    ) -> Result<(), Error> {
        let concurrency = self.options.extract_concurrency.max(1);
        tracing::debug!(
            block_id,
            content_hash,
            entries = entries.len(),
            concurrency,
            "extracting package"
        );

        stream::iter(entries)
            .map(|entry| {
                let key = self.layout.asset_path(block_id, content_hash, &entry.path);
                let store = Arc::clone(&self.store);
                async move { store.write(&key, &entry.bytes).await }
            })
            .buffer_unordered(concurrency)
            .try_collect::<Vec<()>>()
            .await?;
        Ok(())
    }
}
