//! Package ingestion error types
//!
//! Both variants are user-correctable: the message is shown to the
//! submitter as-is.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackageError {
    #[error("Invalid package: {message}")]
    InvalidPackage { message: String },

    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },
}

impl PackageError {
    /// The manifest could not be found at the root of the extracted tree
    #[must_use]
    pub fn missing_manifest() -> Self {
        Self::InvalidPackage {
            message: "could not find 'imsmanifest.xml' file at the root of the zip file"
                .to_string(),
        }
    }
}

impl UserFacingError for PackageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPackage { .. } => {
                Some("Upload a SCORM zip with imsmanifest.xml at its root.")
            }
            Self::InvalidManifest { .. } => Some("Fix the XML in imsmanifest.xml and re-upload."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::InvalidPackage { .. } => "package.invalid_package",
            Self::InvalidManifest { .. } => "package.invalid_manifest",
        })
    }
}
