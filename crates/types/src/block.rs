//! Block (package instance) settings

use crate::package::{PackageMetadata, ScormVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a block lives in the host's course tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockLocation {
    pub org: String,
    pub course: String,
    pub block_type: String,
    pub block_id: String,
}

impl BlockLocation {
    pub fn new(
        org: impl Into<String>,
        course: impl Into<String>,
        block_type: impl Into<String>,
        block_id: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            course: course.into(),
            block_type: block_type.into(),
            block_id: block_id.into(),
        }
    }
}

impl fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.org, self.course, self.block_type, self.block_id
        )
    }
}

/// Author-facing configuration plus the package fields filled in by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSettings {
    pub location: BlockLocation,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_has_score")]
    pub has_score: bool,
    /// Maximum attainable score
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_icon_class")]
    pub icon_class: String,
    #[serde(default)]
    pub version_scorm: ScormVersion,
    #[serde(default)]
    pub path_index_page: String,
    #[serde(default)]
    pub package_meta: Option<PackageMetadata>,
    /// Storage path of a package uploaded before content addressing
    #[serde(default)]
    pub legacy_scorm_file: Option<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub grace_period_secs: Option<i64>,
}

fn default_display_name() -> String {
    "Scorm".to_string()
}

fn default_has_score() -> bool {
    true
}

fn default_weight() -> u32 {
    1
}

fn default_height() -> u32 {
    650
}

fn default_icon_class() -> String {
    BlockSettings::icon_class_for(true).to_string()
}

impl BlockSettings {
    /// Settings for a block that has never been configured
    #[must_use]
    pub fn new(location: BlockLocation) -> Self {
        Self {
            location,
            display_name: default_display_name(),
            has_score: default_has_score(),
            weight: default_weight(),
            width: None,
            height: default_height(),
            icon_class: default_icon_class(),
            version_scorm: ScormVersion::default(),
            path_index_page: String::new(),
            package_meta: None,
            legacy_scorm_file: None,
            due: None,
            grace_period_secs: None,
        }
    }

    #[must_use]
    pub fn block_id(&self) -> &str {
        &self.location.block_id
    }

    /// Icon shown by the host for scored vs. unscored blocks
    #[must_use]
    pub fn icon_class_for(has_score: bool) -> &'static str {
        if has_score {
            "problem"
        } else {
            "video"
        }
    }

    /// Content hash of the current package, if one was ingested
    #[must_use]
    pub fn content_hash(&self) -> Option<&str> {
        self.package_meta.as_ref().map(|m| m.content_hash.as_str())
    }
}
