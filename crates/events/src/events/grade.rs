use serde::{Deserialize, Serialize};

/// Grading outcomes of CMI set calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GradingEvent {
    /// Grade handed to the host grading collaborator
    Published {
        block_id: String,
        learner_id: String,
        value: f64,
        max_value: u32,
    },

    /// A set call arrived after the effective due date and was dropped
    WriteIgnoredPastDue {
        block_id: String,
        learner_id: String,
        name: String,
    },
}
