#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the SCORM package service
//!
//! This crate provides the data model shared by ingestion, the CMI runtime,
//! persistence and the CLI: package metadata, block settings, learner state
//! and the request/response shapes of the runtime protocol.

pub mod block;
pub mod cmi;
pub mod learner;
pub mod package;
pub mod reports;

// Re-export commonly used types
pub use block::{BlockLocation, BlockSettings};
pub use cmi::{CmiElement, CmiRequest, GetResponse, SetResponse, GRADED_LESSON_STATUSES};
pub use learner::{LearnerState, SuccessStatus};
pub use package::{
    original_extension, IngestedPackage, PackageDescriptor, PackageMetadata, ScormVersion,
};
pub use reports::{AuthorMessage, GradeEvent, StudentViewContext, SubmitReport};

use serde::{Deserialize, Serialize};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Tty,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Tty
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
