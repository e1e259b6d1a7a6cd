//! Request types for host-facing operations

use chrono::{DateTime, Utc};
use scorm_types::BlockLocation;
use serde::{Deserialize, Serialize};

/// An uploaded package file
#[derive(Clone, Debug)]
pub struct PackageUpload {
    /// File name as uploaded, used for its extension
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Author-submitted block settings, optionally with a new package
///
/// Fields left `None` keep their stored value.
#[derive(Clone, Debug)]
pub struct SubmitRequest {
    pub location: BlockLocation,
    pub display_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_score: Option<bool>,
    pub weight: Option<u32>,
    pub package: Option<PackageUpload>,
}

impl SubmitRequest {
    #[must_use]
    pub fn new(location: BlockLocation) -> Self {
        Self {
            location,
            display_name: None,
            width: None,
            height: None,
            has_score: None,
            weight: None,
            package: None,
        }
    }

    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.package = Some(PackageUpload {
            name: name.into(),
            bytes,
        });
        self
    }
}

/// Due date and grace period supplied by the host's scheduler
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub due: Option<DateTime<Utc>>,
    pub grace_period_secs: Option<i64>,
}

/// An asset served through the content proxy
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProxyResponse {
    pub content_type: String,
    pub size: usize,
    #[serde(skip)]
    pub body: Vec<u8>,
}
