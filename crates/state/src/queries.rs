//! Runtime SQL queries

use crate::models::{BlockRow, LearnerStateRow};
use scorm_errors::Error;
use sqlx::{query, query_as, Sqlite, Transaction};

/// Get a block by id
pub async fn get_block(
    tx: &mut Transaction<'_, Sqlite>,
    block_id: &str,
) -> Result<Option<BlockRow>, Error> {
    let row = query_as::<_, BlockRow>(
        "SELECT block_id, org, course, block_type, display_name, has_score, weight,
                width, height, icon_class, version_scorm, path_index_page, package_meta,
                legacy_scorm_file, due, grace_period_secs, updated_at
         FROM blocks WHERE block_id = ?1",
    )
    .bind(block_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row)
}

/// Insert or replace a block
pub async fn upsert_block(tx: &mut Transaction<'_, Sqlite>, row: &BlockRow) -> Result<(), Error> {
    query(
        "INSERT OR REPLACE INTO blocks
            (block_id, org, course, block_type, display_name, has_score, weight, width,
             height, icon_class, version_scorm, path_index_page, package_meta,
             legacy_scorm_file, due, grace_period_secs, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )
    .bind(&row.block_id)
    .bind(&row.org)
    .bind(&row.course)
    .bind(&row.block_type)
    .bind(&row.display_name)
    .bind(row.has_score)
    .bind(row.weight)
    .bind(row.width)
    .bind(row.height)
    .bind(&row.icon_class)
    .bind(&row.version_scorm)
    .bind(&row.path_index_page)
    .bind(&row.package_meta)
    .bind(&row.legacy_scorm_file)
    .bind(&row.due)
    .bind(row.grace_period_secs)
    .bind(row.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Get the stored state of one learner on one block
pub async fn get_learner_state(
    tx: &mut Transaction<'_, Sqlite>,
    block_id: &str,
    learner_id: &str,
) -> Result<Option<LearnerStateRow>, Error> {
    let row = query_as::<_, LearnerStateRow>(
        "SELECT block_id, learner_id, lesson_status, success_status, lesson_score, data, updated_at
         FROM learner_states WHERE block_id = ?1 AND learner_id = ?2",
    )
    .bind(block_id)
    .bind(learner_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row)
}

/// Insert or replace a learner's state
pub async fn upsert_learner_state(
    tx: &mut Transaction<'_, Sqlite>,
    row: &LearnerStateRow,
) -> Result<(), Error> {
    query(
        "INSERT OR REPLACE INTO learner_states
            (block_id, learner_id, lesson_status, success_status, lesson_score, data, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&row.block_id)
    .bind(&row.learner_id)
    .bind(&row.lesson_status)
    .bind(&row.success_status)
    .bind(row.lesson_score)
    .bind(&row.data)
    .bind(row.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Learner ids with stored state for a block
pub async fn list_learners(
    tx: &mut Transaction<'_, Sqlite>,
    block_id: &str,
) -> Result<Vec<String>, Error> {
    let learners = sqlx::query_scalar::<_, String>(
        "SELECT learner_id FROM learner_states WHERE block_id = ?1 ORDER BY learner_id",
    )
    .bind(block_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(learners)
}
