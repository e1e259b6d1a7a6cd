//! State manager implementation

use crate::{
    models::{BlockRow, LearnerStateRow},
    queries,
};
use scorm_errors::Error;
use scorm_types::{BlockSettings, LearnerState};
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Durable store for block settings and learner runtime state
#[derive(Clone)]
pub struct StateManager {
    pool: Pool<Sqlite>,
}

impl StateManager {
    /// Open (or create) the database at `db_path` and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or migrations fail.
    pub async fn new(db_path: &Path) -> Result<Self, Error> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }

        let pool = crate::create_pool(db_path).await?;
        crate::run_migrations(&pool).await?;
        tracing::debug!(path = %db_path.display(), "state database ready");

        Ok(Self { pool })
    }

    /// Create a state manager over an existing, migrated pool
    #[must_use]
    pub fn with_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Load a block's settings, if the block was ever saved
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupted.
    pub async fn load_block(&self, block_id: &str) -> Result<Option<BlockSettings>, Error> {
        let mut tx = self.pool.begin().await?;
        let row = queries::get_block(&mut tx, block_id).await?;
        tx.commit().await?;
        row.map(BlockRow::into_settings).transpose()
    }

    /// Save a block's settings, replacing any previous version
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn save_block(&self, settings: &BlockSettings) -> Result<(), Error> {
        let row = BlockRow::from_settings(settings)?;
        let mut tx = self.pool.begin().await?;
        queries::upsert_block(&mut tx, &row).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Load a learner's state, or the defaults if nothing was stored yet
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupted.
    pub async fn load_learner_state(
        &self,
        block_id: &str,
        learner_id: &str,
    ) -> Result<LearnerState, Error> {
        let mut tx = self.pool.begin().await?;
        let row = queries::get_learner_state(&mut tx, block_id, learner_id).await?;
        tx.commit().await?;
        match row {
            Some(row) => row.into_state(),
            None => Ok(LearnerState::default()),
        }
    }

    /// Save a learner's state. Concurrent writers for the same pair race;
    /// the last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn save_learner_state(
        &self,
        block_id: &str,
        learner_id: &str,
        state: &LearnerState,
    ) -> Result<(), Error> {
        let row = LearnerStateRow::from_state(block_id, learner_id, state)?;
        let mut tx = self.pool.begin().await?;
        queries::upsert_learner_state(&mut tx, &row).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Learners with stored state on a block
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_learners(&self, block_id: &str) -> Result<Vec<String>, Error> {
        let mut tx = self.pool.begin().await?;
        let learners = queries::list_learners(&mut tx, block_id).await?;
        tx.commit().await?;
        Ok(learners)
    }
}
