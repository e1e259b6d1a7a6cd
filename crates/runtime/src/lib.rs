#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! SCORM runtime for packaged content
//!
//! Interprets the CMI get/set vocabulary against a learner's durable state
//! and applies grading and due-date policy. Persistence is the caller's
//! job: operations mutate a borrowed [`LearnerState`] and the caller saves
//! it afterwards.
//!
//! [`LearnerState`]: scorm_types::LearnerState

mod cmi;
mod policy;

pub use cmi::CmiRuntime;
pub use policy::GradePolicy;

use scorm_events::{EventEmitter, EventSender, GradingEvent};
use scorm_types::GradeEvent;

/// Host grading collaborator
///
/// Called exactly once per qualifying set call. Delivery is fire-and-forget.
pub trait GradePublisher {
    fn publish(&self, block_id: &str, learner_id: &str, grade: GradeEvent);
}

impl GradePublisher for EventSender {
    fn publish(&self, block_id: &str, learner_id: &str, grade: GradeEvent) {
        self.emit_grade(GradingEvent::Published {
            block_id: block_id.to_string(),
            learner_id: learner_id.to_string(),
            value: grade.value,
            max_value: grade.max_value,
        });
    }
}
