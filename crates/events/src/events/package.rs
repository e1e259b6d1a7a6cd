use serde::{Deserialize, Serialize};
use scorm_types::ScormVersion;

use super::FailureContext;

/// Package ingestion lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PackageEvent {
    IngestStarted {
        block_id: String,
        original_name: String,
        size_bytes: u64,
    },

    /// Archive digest computed
    Fingerprinted {
        block_id: String,
        content_hash: String,
    },

    /// Raw archive persisted for download
    ArchiveStored { block_id: String, path: String },

    EntriesExtracted {
        block_id: String,
        content_hash: String,
        count: usize,
    },

    IngestCompleted {
        block_id: String,
        content_hash: String,
        scorm_version: ScormVersion,
        entry_page: String,
    },

    /// The upload itself is unusable; the submitter has to fix it
    IngestRejected {
        block_id: String,
        failure: FailureContext,
    },

    /// Ingestion aborted by a system fault
    IngestFailed {
        block_id: String,
        failure: FailureContext,
    },
}

impl PackageEvent {
    /// Block the event is about
    #[must_use]
    pub fn block_id(&self) -> &str {
        match self {
            Self::IngestStarted { block_id, .. }
            | Self::Fingerprinted { block_id, .. }
            | Self::ArchiveStored { block_id, .. }
            | Self::EntriesExtracted { block_id, .. }
            | Self::IngestCompleted { block_id, .. }
            | Self::IngestRejected { block_id, .. }
            | Self::IngestFailed { block_id, .. } => block_id,
        }
    }
}
