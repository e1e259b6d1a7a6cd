use serde::{Deserialize, Serialize};

use crate::EventSource;
use scorm_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod grade;
pub mod package;

pub use general::*;
pub use grade::*;
pub use package::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Package ingestion events
    Package(PackageEvent),

    /// Grade publication and due-date gating
    Grade(GradingEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Package(_) => EventSource::PACKAGE,
            Self::Grade(_) => EventSource::GRADE,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Package(PackageEvent::IngestFailed { .. }) => Level::ERROR,

            // Rejected uploads are the submitter's problem, not ours
            Self::General(GeneralEvent::Warning { .. })
            | Self::Package(PackageEvent::IngestRejected { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Package(
                PackageEvent::Fingerprinted { .. }
                | PackageEvent::ArchiveStored { .. }
                | PackageEvent::EntriesExtracted { .. },
            )
            | Self::Grade(GradingEvent::WriteIgnoredPastDue { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Correlation id derived from the event payload, when it names a block
    #[must_use]
    pub fn block_id(&self) -> Option<&str> {
        match self {
            Self::General(_) => None,
            Self::Package(event) => Some(event.block_id()),
            Self::Grade(
                GradingEvent::Published { block_id, .. }
                | GradingEvent::WriteIgnoredPastDue { block_id, .. },
            ) => Some(block_id),
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "scorm::events::general",
            Self::Package(_) => "scorm::events::package",
            Self::Grade(_) => "scorm::events::grade",
        }
    }
}
