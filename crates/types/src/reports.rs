//! Report type definitions for operations

use crate::package::ScormVersion;
use serde::{Deserialize, Serialize};

/// Grade handed to the host's grading collaborator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeEvent {
    pub value: f64,
    pub max_value: u32,
}

/// Outcome of a package submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReport {
    /// Always `"success"`; validation problems go to `errors`
    pub result: String,
    pub errors: Vec<String>,
}

impl SubmitReport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            result: "success".to_string(),
            errors: Vec::new(),
        }
    }
}

impl Default for SubmitReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the host needs to render the learner view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentViewContext {
    /// Proxy URL of the entry page, empty when nothing was uploaded
    pub index_page_url: String,
    pub completion_status: String,
    pub grade: f64,
    pub version_scorm: ScormVersion,
    pub display_name: String,
    pub width: Option<u32>,
    pub height: u32,
}

/// Summary shown to authors
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorMessage {
    pub has_package: bool,
    pub message: String,
}
