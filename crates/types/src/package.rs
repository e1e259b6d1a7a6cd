//! Package-related type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SCORM standard revision a package targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScormVersion {
    #[serde(rename = "SCORM_12")]
    #[default]
    Scorm12,
    #[serde(rename = "SCORM_2004")]
    Scorm2004,
}

impl ScormVersion {
    /// Classify a manifest's `schemaversion` text.
    ///
    /// Only the literal `1.2`, optionally followed by a single newline, is
    /// SCORM 1.2. Any other present value means 2004, including padded text,
    /// and a missing element means 1.2.
    #[must_use]
    pub fn from_schema_version(text: Option<&str>) -> Self {
        match text {
            None | Some("1.2" | "1.2\n") => Self::Scorm12,
            Some(_) => Self::Scorm2004,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scorm12 => "SCORM_12",
            Self::Scorm2004 => "SCORM_2004",
        }
    }
}

impl FromStr for ScormVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCORM_12" => Ok(Self::Scorm12),
            "SCORM_2004" => Ok(Self::Scorm2004),
            other => Err(format!("unknown SCORM version: {other}")),
        }
    }
}

impl fmt::Display for ScormVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about an uploaded archive, fixed at ingestion time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Hex BLAKE3 digest of the original archive bytes
    pub content_hash: String,
    /// Name the archive was uploaded under
    pub original_name: String,
    /// Archive size in bytes
    pub size_bytes: u64,
    /// When ingestion finished
    pub ingested_at: DateTime<Utc>,
}

impl PackageMetadata {
    /// Extension of the original upload, including the leading dot
    #[must_use]
    pub fn extension(&self) -> &str {
        original_extension(&self.original_name)
    }
}

/// What the manifest says about a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub scorm_version: ScormVersion,
    /// Entry page, relative to the extracted tree
    pub entry_page_path: String,
}

/// Result of a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestedPackage {
    pub metadata: PackageMetadata,
    pub descriptor: PackageDescriptor,
}

/// Extension of a file name, dot included, or `""` when there is none.
///
/// Leading dots of the final path component do not start an extension, so
/// `.zip` has none while `course.v2.zip` yields `.zip`.
#[must_use]
pub fn original_extension(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    let Some(dot) = base.rfind('.') else {
        return "";
    };
    if base[..dot].bytes().all(|b| b == b'.') {
        return "";
    }
    &base[dot..]
}
