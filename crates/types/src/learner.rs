//! Per-learner runtime state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `cmi.success_status` value
///
/// Values outside the three known ones are kept as reported by the content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum SuccessStatus {
    Passed,
    Failed,
    #[default]
    Unknown,
    Other(String),
}

impl SuccessStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for SuccessStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<SuccessStatus> for String {
    fn from(value: SuccessStatus) -> Self {
        match value {
            SuccessStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SuccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record for one (block, learner) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerState {
    #[serde(default = "default_lesson_status")]
    pub lesson_status: String,
    #[serde(default)]
    pub success_status: SuccessStatus,
    /// Score already scaled into `[0, weight]`
    #[serde(default)]
    pub lesson_score: f64,
    /// CMI elements without dedicated fields, stored as reported
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

fn default_lesson_status() -> String {
    "not attempted".to_string()
}

impl Default for LearnerState {
    fn default() -> Self {
        Self {
            lesson_status: default_lesson_status(),
            success_status: SuccessStatus::default(),
            lesson_score: 0.0,
            data: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = LearnerState::default();
        assert_eq!(state.lesson_status, "not attempted");
        assert_eq!(state.success_status, SuccessStatus::Unknown);
        assert!(state.lesson_score.abs() < f64::EPSILON);
        assert!(state.data.is_empty());
    }

    #[test]
    fn test_success_status_keeps_unknown_values() {
        let status = SuccessStatus::from("incomplete".to_string());
        assert_eq!(status, SuccessStatus::Other("incomplete".into()));
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#""incomplete""#
        );
    }
}
