//! Runtime (CMI get/set) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuntimeError {
    #[error("request is missing the CMI element name")]
    MissingName,

    #[error("score is not a number: {value}")]
    InvalidScore { value: String },

    #[error("block not found: {block_id}")]
    BlockNotFound { block_id: String },
}

impl UserFacingError for RuntimeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingName => Some("Send a JSON body with a \"name\" field."),
            Self::BlockNotFound { .. } => Some("Submit a package for this block first."),
            Self::InvalidScore { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::MissingName => "runtime.missing_name",
            Self::InvalidScore { .. } => "runtime.invalid_score",
            Self::BlockNotFound { .. } => "runtime.block_not_found",
        })
    }
}
