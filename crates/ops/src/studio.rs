//! Author-side operations: settings, package submission, scheduling

use crate::{OpsCtx, Schedule, SubmitRequest};
use scorm_errors::Error;
use scorm_events::EventEmitter;
use scorm_types::{AuthorMessage, BlockSettings, SubmitReport};

const NO_PACKAGE_MESSAGE: &str =
    "No SCORM package has been uploaded yet. Edit the component to configure it.";
const LMS_ONLY_MESSAGE: &str = "The SCORM component is only visible in the LMS.";

/// Apply submitted settings and ingest an accompanying package.
///
/// Settings are saved before the package is touched and stay saved when
/// ingestion fails. A rejected package lands in the report's `errors`
/// while `result` stays `"success"`; the block's package fields keep
/// their previous values.
///
/// # Errors
///
/// Returns storage and state errors; package validation problems are
/// reported, not returned.
pub async fn studio_submit(ctx: &OpsCtx, request: SubmitRequest) -> Result<SubmitReport, Error> {
    let block_id = request.location.block_id.clone();
    ctx.emit_operation_started(format!("submit {block_id}"));

    let mut settings = ctx
        .state
        .load_block(&block_id)
        .await?
        .unwrap_or_else(|| BlockSettings::new(request.location.clone()));
    settings.location = request.location;
    if let Some(display_name) = request.display_name {
        settings.display_name = display_name;
    }
    if request.width.is_some() {
        settings.width = request.width;
    }
    if let Some(height) = request.height {
        settings.height = height;
    }
    if let Some(has_score) = request.has_score {
        settings.has_score = has_score;
    }
    if let Some(weight) = request.weight {
        settings.weight = weight;
    }
    settings.icon_class = BlockSettings::icon_class_for(settings.has_score).to_string();
    ctx.state.save_block(&settings).await?;

    let mut report = SubmitReport::new();
    let Some(upload) = request.package else {
        ctx.emit_operation_completed(format!("submit {block_id}"), true);
        return Ok(report);
    };

    match ctx
        .ingestor
        .ingest(&settings.location, upload.bytes, &upload.name)
        .await
    {
        Ok(package) => {
            settings.version_scorm = package.descriptor.scorm_version;
            settings.path_index_page = package.descriptor.entry_page_path;
            settings.package_meta = Some(package.metadata);
            settings.legacy_scorm_file = None;
            ctx.state.save_block(&settings).await?;
            tracing::info!(
                block_id = %block_id,
                version = %settings.version_scorm,
                entry_page = %settings.path_index_page,
                "package updated"
            );
        }
        Err(err) if err.is_user_correctable() => {
            tracing::info!(block_id = %block_id, error = %err, "package rejected");
            report.errors.push(err.to_string());
        }
        Err(err) => {
            ctx.emit_operation_failed(format!("submit {block_id}"), err.to_string());
            return Err(err);
        }
    }

    ctx.emit_operation_completed(format!("submit {block_id}"), report.errors.is_empty());
    Ok(report)
}

/// Set or clear a block's due date and grace period
///
/// # Errors
///
/// Returns `RuntimeError::BlockNotFound` for unknown blocks and state
/// errors from persistence.
pub async fn schedule(
    ctx: &OpsCtx,
    block_id: &str,
    schedule: Schedule,
) -> Result<BlockSettings, Error> {
    let mut settings = ctx.require_block(block_id).await?;
    settings.due = schedule.due;
    settings.grace_period_secs = schedule.grace_period_secs;
    ctx.state.save_block(&settings).await?;
    Ok(settings)
}

/// Summary shown to authors in the editing view
///
/// # Errors
///
/// Returns `RuntimeError::BlockNotFound` for unknown blocks.
pub async fn author_message(ctx: &OpsCtx, block_id: &str) -> Result<AuthorMessage, Error> {
    let settings = ctx.require_block(block_id).await?;
    let has_package = !settings.path_index_page.is_empty();
    Ok(AuthorMessage {
        has_package,
        message: if has_package {
            LMS_ONLY_MESSAGE
        } else {
            NO_PACKAGE_MESSAGE
        }
        .to_string(),
    })
}
