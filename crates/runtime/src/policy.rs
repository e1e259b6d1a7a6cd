//! Grading and due-date policy

use chrono::{DateTime, Duration, Utc};
use scorm_types::{BlockSettings, GradeEvent, LearnerState, ScormVersion, SuccessStatus};

/// Grade rules for one block
#[derive(Debug, Clone, Copy)]
pub struct GradePolicy<'a> {
    settings: &'a BlockSettings,
}

impl<'a> GradePolicy<'a> {
    #[must_use]
    pub fn new(settings: &'a BlockSettings) -> Self {
        Self { settings }
    }

    /// Due date plus grace period, when a due date is set
    #[must_use]
    pub fn effective_due_date(&self) -> Option<DateTime<Utc>> {
        let due = self.settings.due?;
        match self.settings.grace_period_secs {
            Some(secs) => {
                Duration::try_seconds(secs).and_then(|grace| due.checked_add_signed(grace))
            }
            None => Some(due),
        }
    }

    /// Whether writes are frozen at `now`
    #[must_use]
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.effective_due_date().is_some_and(|close| now > close)
    }

    /// Status shown to the host and echoed by every set call
    ///
    /// SCORM 2004 content reports success separately from completion;
    /// a known success status wins over the lesson status.
    #[must_use]
    pub fn completion_status(&self, state: &LearnerState) -> String {
        if self.settings.version_scorm == ScormVersion::Scorm2004
            && state.success_status != SuccessStatus::Unknown
        {
            state.success_status.to_string()
        } else {
            state.lesson_status.clone()
        }
    }

    #[must_use]
    pub fn reported_grade(&self, state: &LearnerState) -> f64 {
        let failed_2004 = self.settings.version_scorm == ScormVersion::Scorm2004
            && matches!(
                state.success_status,
                SuccessStatus::Failed | SuccessStatus::Unknown
            );
        if state.lesson_status == "failed" || failed_2004 {
            0.0
        } else {
            state.lesson_score
        }
    }

    /// `None` means the block has no score dimension
    #[must_use]
    pub fn max_score(&self) -> Option<u32> {
        self.settings.has_score.then_some(self.settings.weight)
    }

    /// Convert a 0-100 CMI score into the block's weighted unit.
    ///
    /// Falls back to dividing first when the product overflows, so the result
    /// is only non-finite when the weighted score itself is out of range.
    #[must_use]
    pub fn weighted_score(&self, raw: f64) -> f64 {
        let weight = f64::from(self.settings.weight);
        let score = raw * weight / 100.0;
        if score.is_finite() {
            score
        } else {
            raw / 100.0 * weight
        }
    }

    /// Score after a host-driven rescore of `raw_earned` points
    #[must_use]
    pub fn rescored(&self, raw_earned: f64) -> f64 {
        if self.settings.weight == 0 {
            return 0.0;
        }
        raw_earned / f64::from(self.settings.weight)
    }

    #[must_use]
    pub fn grade_event(&self, state: &LearnerState) -> GradeEvent {
        GradeEvent {
            value: state.lesson_score,
            max_value: self.settings.weight,
        }
    }
}
