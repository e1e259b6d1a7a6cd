//! CMI get/set dispatch

use crate::{GradePolicy, GradePublisher};
use chrono::{DateTime, Utc};
use scorm_errors::{Error, RuntimeError};
use scorm_events::{EventEmitter, EventSender, GradingEvent};
use scorm_types::{
    BlockSettings, CmiElement, CmiRequest, GetResponse, LearnerState, SetResponse, SuccessStatus,
    GRADED_LESSON_STATUSES,
};
use serde_json::Value;

/// CMI protocol for one learner on one block
pub struct CmiRuntime<'a, P: ?Sized> {
    settings: &'a BlockSettings,
    learner_id: &'a str,
    publisher: &'a P,
    tx: Option<EventSender>,
}

impl<P: ?Sized> EventEmitter for CmiRuntime<'_, P> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl<'a, P: GradePublisher + ?Sized> CmiRuntime<'a, P> {
    #[must_use]
    pub fn new(settings: &'a BlockSettings, learner_id: &'a str, publisher: &'a P) -> Self {
        Self {
            settings,
            learner_id,
            publisher,
            tx: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn policy(&self) -> GradePolicy<'a> {
        GradePolicy::new(self.settings)
    }

    /// Answer a get call.
    ///
    /// Scores are read back on the 0-100 CMI scale; unknown names that were
    /// never set read as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::MissingName` if the request has no name.
    pub fn get_value(
        &self,
        state: &LearnerState,
        request: &CmiRequest,
    ) -> Result<GetResponse, Error> {
        let name = request.name.as_deref().ok_or(RuntimeError::MissingName)?;
        let value = match CmiElement::from_name(name) {
            CmiElement::LessonStatus => Value::String(state.lesson_status.clone()),
            CmiElement::SuccessStatus => Value::String(state.success_status.to_string()),
            CmiElement::ScoreRaw => Value::from(state.lesson_score * 100.0),
            CmiElement::Other(name) => state
                .data
                .get(name)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
        };
        Ok(GetResponse { value })
    }

    /// Apply a set call at the current time.
    ///
    /// # Errors
    ///
    /// See [`CmiRuntime::set_value_at`].
    pub fn set_value(
        &self,
        state: &mut LearnerState,
        request: CmiRequest,
    ) -> Result<SetResponse, Error> {
        self.set_value_at(state, request, Utc::now())
    }

    /// Apply a set call as of `now`.
    ///
    /// Past the effective due date the write is dropped and the call still
    /// succeeds. Qualifying status and score writes on scored blocks publish
    /// exactly one grade.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::MissingName` if the request has no name and
    /// `RuntimeError::InvalidScore` if a score is not a number or its
    /// weighted value is out of range.
    pub fn set_value_at(
        &self,
        state: &mut LearnerState,
        request: CmiRequest,
        now: DateTime<Utc>,
    ) -> Result<SetResponse, Error> {
        let CmiRequest { name, value } = request;
        let name = name.ok_or(RuntimeError::MissingName)?;
        let policy = self.policy();

        if policy.is_past_due(now) {
            tracing::debug!(
                block_id = self.settings.block_id(),
                learner_id = self.learner_id,
                name = %name,
                "ignoring write past due date"
            );
            self.emit_grade(GradingEvent::WriteIgnoredPastDue {
                block_id: self.settings.block_id().to_string(),
                learner_id: self.learner_id.to_string(),
                name,
            });
            return Ok(SetResponse::success(policy.completion_status(state), None));
        }

        let scored = self.settings.has_score;
        let lesson_score = match CmiElement::from_name(&name) {
            CmiElement::LessonStatus => {
                let status = value_text(value.as_ref());
                let graded = GRADED_LESSON_STATUSES.contains(&status.as_str());
                state.lesson_status = status;
                (scored && graded).then(|| self.publish(state))
            }
            CmiElement::SuccessStatus => {
                state.success_status = SuccessStatus::from(value_text(value.as_ref()));
                if scored {
                    if state.success_status == SuccessStatus::Unknown {
                        state.lesson_score = 0.0;
                    }
                    Some(self.publish(state))
                } else {
                    None
                }
            }
            CmiElement::ScoreRaw if scored => {
                let weighted = policy.weighted_score(parse_score(value.as_ref())?);
                if !weighted.is_finite() {
                    return Err(RuntimeError::InvalidScore {
                        value: value.as_ref().map(Value::to_string).unwrap_or_default(),
                    }
                    .into());
                }
                state.lesson_score = weighted;
                Some(self.publish(state))
            }
            CmiElement::ScoreRaw | CmiElement::Other(_) => {
                let value = value.unwrap_or_else(|| Value::String(String::new()));
                state.data.insert(name.clone(), value);
                None
            }
        };

        Ok(SetResponse::success(policy.completion_status(state), lesson_score))
    }

    /// Replace the stored score after a host-side rescore
    pub fn set_score(&self, state: &mut LearnerState, raw_earned: f64) {
        state.lesson_score = self.policy().rescored(raw_earned);
    }

    fn publish(&self, state: &LearnerState) -> f64 {
        let grade = self.policy().grade_event(state);
        tracing::debug!(
            block_id = self.settings.block_id(),
            learner_id = self.learner_id,
            value = grade.value,
            max_value = grade.max_value,
            "publishing grade"
        );
        self.publisher.publish(self.settings.block_id(), self.learner_id, grade);
        state.lesson_score
    }
}

/// Status text carried by a set call
fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Raw score on the 0-100 scale; a missing value counts as zero
fn parse_score(value: Option<&Value>) -> Result<f64, Error> {
    let score = match value {
        None => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match score {
        Some(score) if score.is_finite() => Ok(score),
        _ => Err(RuntimeError::InvalidScore {
            value: value.map(Value::to_string).unwrap_or_default(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(None), "");
        assert_eq!(value_text(Some(&Value::Null)), "");
        assert_eq!(value_text(Some(&Value::from("passed"))), "passed");
        assert_eq!(value_text(Some(&Value::from(true))), "true");
    }

    #[test]
    fn test_parse_score() {
        assert!((parse_score(Some(&Value::from("20"))).unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((parse_score(Some(&Value::from(" 7.5 "))).unwrap() - 7.5).abs() < f64::EPSILON);
        assert!((parse_score(Some(&Value::from(85))).unwrap() - 85.0).abs() < f64::EPSILON);
        assert!(parse_score(None).unwrap().abs() < f64::EPSILON);
        assert!(parse_score(Some(&Value::from("abc"))).is_err());
        assert!(parse_score(Some(&Value::from("NaN"))).is_err());
        assert!(parse_score(Some(&Value::Null)).is_err());
    }
}
