//! Database rows and their conversion to domain types

use chrono::{DateTime, Utc};
use scorm_errors::{Error, StateError};
use scorm_types::{BlockLocation, BlockSettings, LearnerState, PackageMetadata, SuccessStatus};
use sqlx::FromRow;
use std::collections::BTreeMap;

fn corrupted(message: impl Into<String>) -> Error {
    StateError::Corrupted {
        message: message.into(),
    }
    .into()
}

fn to_u32(field: &str, value: i64) -> Result<u32, Error> {
    u32::try_from(value).map_err(|_| corrupted(format!("{field} out of range: {value}")))
}

/// A row of the `blocks` table
#[derive(Debug, Clone, FromRow)]
pub struct BlockRow {
    pub block_id: String,
    pub org: String,
    pub course: String,
    pub block_type: String,
    pub display_name: String,
    pub has_score: bool,
    pub weight: i64,
    pub width: Option<i64>,
    pub height: i64,
    pub icon_class: String,
    pub version_scorm: String,
    pub path_index_page: String,
    /// `PackageMetadata` as JSON
    pub package_meta: Option<String>,
    pub legacy_scorm_file: Option<String>,
    /// RFC 3339
    pub due: Option<String>,
    pub grace_period_secs: Option<i64>,
    pub updated_at: i64,
}

impl BlockRow {
    /// Flatten settings into a row
    ///
    /// # Errors
    ///
    /// Returns an error if the package metadata cannot be serialized.
    pub fn from_settings(settings: &BlockSettings) -> Result<Self, Error> {
        let package_meta = settings
            .package_meta
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(Self {
            block_id: settings.location.block_id.clone(),
            org: settings.location.org.clone(),
            course: settings.location.course.clone(),
            block_type: settings.location.block_type.clone(),
            display_name: settings.display_name.clone(),
            has_score: settings.has_score,
            weight: i64::from(settings.weight),
            width: settings.width.map(i64::from),
            height: i64::from(settings.height),
            icon_class: settings.icon_class.clone(),
            version_scorm: settings.version_scorm.to_string(),
            path_index_page: settings.path_index_page.clone(),
            package_meta,
            legacy_scorm_file: settings.legacy_scorm_file.clone(),
            due: settings.due.map(|due| due.to_rfc3339()),
            grace_period_secs: settings.grace_period_secs,
            updated_at: Utc::now().timestamp(),
        })
    }

    /// Rebuild settings from a stored row
    ///
    /// # Errors
    ///
    /// Returns `StateError::Corrupted` if a column holds a value the domain
    /// types cannot represent.
    pub fn into_settings(self) -> Result<BlockSettings, Error> {
        let package_meta = self
            .package_meta
            .as_deref()
            .map(serde_json::from_str::<PackageMetadata>)
            .transpose()
            .map_err(|e| corrupted(format!("package_meta for {}: {e}", self.block_id)))?;
        let due = self
            .due
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| corrupted(format!("due date for {}: {e}", self.block_id)))?
            .map(|due| due.with_timezone(&Utc));

        Ok(BlockSettings {
            version_scorm: self.version_scorm.parse().map_err(corrupted)?,
            weight: to_u32("weight", self.weight)?,
            width: self.width.map(|w| to_u32("width", w)).transpose()?,
            height: to_u32("height", self.height)?,
            location: BlockLocation::new(self.org, self.course, self.block_type, self.block_id),
            display_name: self.display_name,
            has_score: self.has_score,
            icon_class: self.icon_class,
            path_index_page: self.path_index_page,
            package_meta,
            legacy_scorm_file: self.legacy_scorm_file,
            due,
            grace_period_secs: self.grace_period_secs,
        })
    }
}

/// A row of the `learner_states` table
#[derive(Debug, Clone, FromRow)]
pub struct LearnerStateRow {
    pub block_id: String,
    pub learner_id: String,
    pub lesson_status: String,
    pub success_status: String,
    pub lesson_score: f64,
    /// Free-form CMI values as a JSON object
    pub data: String,
    pub updated_at: i64,
}

impl LearnerStateRow {
    /// # Errors
    ///
    /// Returns an error if the data bag cannot be serialized.
    pub fn from_state(
        block_id: &str,
        learner_id: &str,
        state: &LearnerState,
    ) -> Result<Self, Error> {
        Ok(Self {
            block_id: block_id.to_string(),
            learner_id: learner_id.to_string(),
            lesson_status: state.lesson_status.clone(),
            success_status: state.success_status.to_string(),
            lesson_score: state.lesson_score,
            data: serde_json::to_string(&state.data)?,
            updated_at: Utc::now().timestamp(),
        })
    }

    /// # Errors
    ///
    /// Returns `StateError::Corrupted` if the data bag is not a JSON object.
    pub fn into_state(self) -> Result<LearnerState, Error> {
        let data: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&self.data).map_err(|e| {
                corrupted(format!("data for {}/{}: {e}", self.block_id, self.learner_id))
            })?;
        Ok(LearnerState {
            lesson_status: self.lesson_status,
            success_status: SuccessStatus::from(self.success_status),
            lesson_score: self.lesson_score,
            data,
        })
    }
}
