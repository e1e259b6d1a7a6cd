//! System setup and initialization

use crate::error::CliError;
use scorm_config::Config;
use scorm_state::StateManager;
use scorm_store::{ContentStore, LocalStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Initialized service components
pub struct SystemSetup {
    store: Arc<dyn ContentStore>,
    state: StateManager,
}

impl SystemSetup {
    /// Open the content store and the state database described by `config`
    pub async fn initialize(config: &Config) -> Result<Self, CliError> {
        info!("Initializing scorm components");

        let root = &config.storage.root;
        tokio::fs::create_dir_all(root).await?;
        debug!(root = %root.display(), "content store ready");

        let db_path = config.db_path();
        let state = StateManager::new(&db_path).await?;
        debug!(db = %db_path.display(), "state database ready");

        Ok(Self {
            store: Arc::new(LocalStore::new(root.clone())),
            state,
        })
    }

    /// Content store backing packages and extracted assets
    pub fn store(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.store)
    }

    /// Settings and learner state database
    pub fn state(&self) -> &StateManager {
        &self.state
    }
}
