//! Learner-side operations: the CMI runtime handlers and the student view

use crate::{content::live_url, OpsCtx};
use scorm_errors::Error;
use scorm_runtime::{CmiRuntime, GradePolicy};
use scorm_types::{CmiRequest, GetResponse, LearnerState, SetResponse, StudentViewContext};

/// Handle a CMI get call from packaged content
///
/// # Errors
///
/// Returns `RuntimeError::BlockNotFound` for unknown blocks,
/// `RuntimeError::MissingName` for requests without a name, and state
/// errors from persistence.
pub async fn get_value(
    ctx: &OpsCtx,
    block_id: &str,
    learner_id: &str,
    request: &CmiRequest,
) -> Result<GetResponse, Error> {
    let settings = ctx.require_block(block_id).await?;
    let state = ctx.state.load_learner_state(block_id, learner_id).await?;
    CmiRuntime::new(&settings, learner_id, &ctx.tx).get_value(&state, request)
}

/// Handle a CMI set call from packaged content
///
/// The learner's state is saved only when the call changed it.
///
/// # Errors
///
/// Returns `RuntimeError::BlockNotFound` for unknown blocks, validation
/// errors for malformed requests, and state errors from persistence.
pub async fn set_value(
    ctx: &OpsCtx,
    block_id: &str,
    learner_id: &str,
    request: CmiRequest,
) -> Result<SetResponse, Error> {
    let settings = ctx.require_block(block_id).await?;
    let mut state = ctx.state.load_learner_state(block_id, learner_id).await?;
    let before = state.clone();

    let response = CmiRuntime::new(&settings, learner_id, &ctx.tx)
        .with_event_sender(ctx.tx.clone())
        .set_value(&mut state, request)?;

    if state != before {
        ctx.state
            .save_learner_state(block_id, learner_id, &state)
            .await?;
    }
    Ok(response)
}

/// Rescore a learner from `raw_earned` points
///
/// # Errors
///
/// Returns `RuntimeError::BlockNotFound` for unknown blocks and state
/// errors from persistence.
pub async fn set_score(
    ctx: &OpsCtx,
    block_id: &str,
    learner_id: &str,
    raw_earned: f64,
) -> Result<LearnerState, Error> {
    let settings = ctx.require_block(block_id).await?;
    let mut state = ctx.state.load_learner_state(block_id, learner_id).await?;
    CmiRuntime::new(&settings, learner_id, &ctx.tx).set_score(&mut state, raw_earned);
    ctx.state
        .save_learner_state(block_id, learner_id, &state)
        .await?;
    Ok(state)
}

/// Everything the host needs to render a learner's view of a block
///
/// # Errors
///
/// Returns `RuntimeError::BlockNotFound` for unknown blocks and state
/// errors from persistence.
pub async fn student_view(
    ctx: &OpsCtx,
    block_id: &str,
    learner_id: &str,
) -> Result<StudentViewContext, Error> {
    let settings = ctx.require_block(block_id).await?;
    let state = ctx.state.load_learner_state(block_id, learner_id).await?;
    let policy = GradePolicy::new(&settings);

    Ok(StudentViewContext {
        index_page_url: live_url(&settings, &ctx.config.proxy.route_prefix),
        completion_status: policy.completion_status(&state),
        grade: policy.reported_grade(&state),
        version_scorm: settings.version_scorm,
        display_name: settings.display_name.clone(),
        width: settings.width,
        height: settings.height,
    })
}
