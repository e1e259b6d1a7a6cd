//! CMI runtime protocol shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LESSON_STATUS_12: &str = "cmi.core.lesson_status";
pub const COMPLETION_STATUS_2004: &str = "cmi.completion_status";
pub const SUCCESS_STATUS: &str = "cmi.success_status";
pub const SCORE_RAW_12: &str = "cmi.core.score.raw";
pub const SCORE_RAW_2004: &str = "cmi.score.raw";

/// Lesson statuses that make a scored block publish its grade
pub const GRADED_LESSON_STATUSES: [&str; 3] = ["completed", "failed", "passed"];

/// A CMI element name, classified
///
/// Known elements map onto dedicated learner fields; everything else lands
/// in the free-form data bag under its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmiElement<'a> {
    LessonStatus,
    SuccessStatus,
    ScoreRaw,
    Other(&'a str),
}

impl<'a> CmiElement<'a> {
    #[must_use]
    pub fn from_name(name: &'a str) -> Self {
        match name {
            LESSON_STATUS_12 | COMPLETION_STATUS_2004 => Self::LessonStatus,
            SUCCESS_STATUS => Self::SuccessStatus,
            SCORE_RAW_12 | SCORE_RAW_2004 => Self::ScoreRaw,
            other => Self::Other(other),
        }
    }
}

/// Body of a get or set call from packaged content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmiRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl CmiRequest {
    pub fn get(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: None,
        }
    }

    pub fn set(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    pub value: Value,
}

/// Answer to a set call
///
/// `result` is always `"success"`, even when a past-due block ignored the write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetResponse {
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_score: Option<f64>,
    pub completion_status: String,
}

impl SetResponse {
    #[must_use]
    pub fn success(completion_status: String, lesson_score: Option<f64>) -> Self {
        Self {
            result: "success".to_string(),
            lesson_score,
            completion_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_dispatch() {
        assert_eq!(
            CmiElement::from_name("cmi.core.lesson_status"),
            CmiElement::LessonStatus
        );
        assert_eq!(
            CmiElement::from_name("cmi.completion_status"),
            CmiElement::LessonStatus
        );
        assert_eq!(
            CmiElement::from_name("cmi.success_status"),
            CmiElement::SuccessStatus
        );
        assert_eq!(CmiElement::from_name("cmi.score.raw"), CmiElement::ScoreRaw);
        assert_eq!(
            CmiElement::from_name("cmi.core.score.raw"),
            CmiElement::ScoreRaw
        );
        assert_eq!(
            CmiElement::from_name("cmi.suspend_data"),
            CmiElement::Other("cmi.suspend_data")
        );
    }

    #[test]
    fn test_set_response_omits_absent_score() {
        let json = serde_json::to_value(SetResponse::success("incomplete".into(), None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"result": "success", "completion_status": "incomplete"})
        );
    }

    #[test]
    fn test_request_without_value() {
        let req: CmiRequest = serde_json::from_str(r#"{"name": "cmi.score.raw"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("cmi.score.raw"));
        assert!(req.value.is_none());
    }
}
