//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so
//! the JSON log file can be consumed by observability tools.

use scorm_events::{AppEvent, EventMessage, GeneralEvent, GradingEvent, PackageEvent};
use tracing::{debug, error, info, warn};

/// Log an event through tracing with its metadata attached
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::General(event) => match event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    context = ?context,
                    "{message}"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    details = ?details,
                    "{message}"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    context = ?context,
                    "{message}"
                );
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    success = success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    error = %error,
                    "Operation failed"
                );
            }
        },

        AppEvent::Package(event) => log_package_event(message, event),

        AppEvent::Grade(event) => match event {
            GradingEvent::Published {
                block_id,
                learner_id,
                value,
                max_value,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    block_id = %block_id,
                    learner_id = %learner_id,
                    value = value,
                    max_value = max_value,
                    "Grade published"
                );
            }
            GradingEvent::WriteIgnoredPastDue {
                block_id,
                learner_id,
                name,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    block_id = %block_id,
                    learner_id = %learner_id,
                    name = %name,
                    "Write ignored after due date"
                );
            }
        },
    }
}

fn log_package_event(message: &EventMessage, event: &PackageEvent) {
    let meta = &message.meta;
    match event {
        PackageEvent::IngestStarted {
            block_id,
            original_name,
            size_bytes,
        } => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                original_name = %original_name,
                size_bytes = size_bytes,
                "Package ingestion started"
            );
        }
        PackageEvent::Fingerprinted {
            block_id,
            content_hash,
        } => {
            debug!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                content_hash = %content_hash,
                "Package fingerprinted"
            );
        }
        PackageEvent::ArchiveStored { block_id, path } => {
            debug!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                path = %path,
                "Archive stored"
            );
        }
        PackageEvent::EntriesExtracted {
            block_id,
            content_hash,
            count,
        } => {
            debug!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                content_hash = %content_hash,
                count = count,
                "Entries extracted"
            );
        }
        PackageEvent::IngestCompleted {
            block_id,
            content_hash,
            scorm_version,
            entry_page,
        } => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                content_hash = %content_hash,
                scorm_version = %scorm_version,
                entry_page = %entry_page,
                "Package ingestion completed"
            );
        }
        PackageEvent::IngestRejected { block_id, failure } => {
            warn!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                code = ?failure.code,
                message = %failure.message,
                hint = ?failure.hint,
                "Package rejected"
            );
        }
        PackageEvent::IngestFailed { block_id, failure } => {
            error!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                block_id = %block_id,
                retryable = failure.retryable,
                code = ?failure.code,
                message = %failure.message,
                hint = ?failure.hint,
                "Package ingestion failed"
            );
        }
    }
}
