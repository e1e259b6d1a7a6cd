//! Operations context for dependency injection

use scorm_config::Config;
use scorm_errors::{ConfigError, Error, RuntimeError};
use scorm_events::{EventEmitter, EventSender};
use scorm_ingest::{IngestOptions, PackageIngestor};
use scorm_state::StateManager;
use scorm_store::{ContentStore, StorageLayout};
use scorm_types::BlockSettings;
use std::sync::Arc;

/// Operations context providing access to all service components
#[derive(Clone)]
pub struct OpsCtx {
    /// Content store for archives and extracted assets
    pub store: Arc<dyn ContentStore>,
    /// Block and learner persistence
    pub state: StateManager,
    /// Package ingestion pipeline over `store`
    pub ingestor: PackageIngestor,
    /// Event sender for progress reporting and grade delivery
    pub tx: EventSender,
    /// Service configuration
    pub config: Config,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl OpsCtx {
    /// Key layout extracted assets are stored under
    #[must_use]
    pub fn layout(&self) -> &StorageLayout {
        self.ingestor.layout()
    }

    /// Load a block that must already exist
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::BlockNotFound` if the block was never saved.
    pub async fn require_block(&self, block_id: &str) -> Result<BlockSettings, Error> {
        self.state
            .load_block(block_id)
            .await?
            .ok_or_else(|| {
                RuntimeError::BlockNotFound {
                    block_id: block_id.to_string(),
                }
                .into()
            })
    }
}

/// Builder for the operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    store: Option<Arc<dyn ContentStore>>,
    state: Option<StateManager>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set content store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set state manager
    #[must_use]
    pub fn with_state(mut self, state: StateManager) -> Self {
        self.state = Some(state);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let store = self.store.ok_or_else(|| missing("store"))?;
        let state = self.state.ok_or_else(|| missing("state"))?;
        let tx = self.tx.ok_or_else(|| missing("event_sender"))?;
        let config = self.config.unwrap_or_default();

        let ingestor = PackageIngestor::new(
            Arc::clone(&store),
            StorageLayout::new(config.storage.location.clone()),
        )
        .with_options(IngestOptions {
            extract_concurrency: config.extract_concurrency(),
            max_archive_bytes: config.ingest.max_archive_bytes,
            max_extracted_bytes: config.ingest.max_extracted_bytes,
        })
        .with_event_sender(tx.clone());

        Ok(OpsCtx {
            store,
            state,
            ingestor,
            tx,
            config,
        })
    }
}

fn missing(component: &str) -> Error {
    ConfigError::MissingField {
        field: component.to_string(),
    }
    .into()
}
