#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for the SCORM service
//!
//! This crate is the layer between a front end (CLI or HTTP handlers) and
//! the specialized crates. Each operation loads what it needs from state,
//! delegates to ingestion or the CMI runtime, and persists the result.

mod content;
mod context;
mod learner;
mod studio;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use types::{PackageUpload, ProxyResponse, Schedule, SubmitRequest};

pub use content::{live_url, package_download_path, proxy_media};
pub use learner::{get_value, set_score, set_value, student_view};
pub use studio::{author_message, schedule, studio_submit};

use scorm_errors::Error;
use scorm_types::{
    AuthorMessage, BlockSettings, GetResponse, LearnerState, SetResponse, StudentViewContext,
    SubmitReport,
};

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Package submission report
    Submit(SubmitReport),
    /// CMI get answer
    Value(GetResponse),
    /// CMI set answer
    SetResult(SetResponse),
    /// Proxied asset metadata
    Proxied(ProxyResponse),
    /// Learner view context
    StudentView(StudentViewContext),
    /// Author summary
    AuthorMessage(AuthorMessage),
    /// Stored block settings
    Block(Box<BlockSettings>),
    /// Learner state after a rescore
    LearnerState(LearnerState),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::Submit(report) => report.errors.is_empty(),
            OperationResult::Value(_)
            | OperationResult::SetResult(_)
            | OperationResult::Proxied(_)
            | OperationResult::StudentView(_)
            | OperationResult::AuthorMessage(_)
            | OperationResult::Block(_)
            | OperationResult::LearnerState(_)
            | OperationResult::Success(_) => true,
        }
    }
}
