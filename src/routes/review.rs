//! Review route handlers
//!
//! Admin side: list pending proposals and commit or reject them.

use crate::error::ApiResult;
use crate::models::{QuestionRecord, SuccessResponse};
use crate::state::SharedState;
use crate::translation::{ResolveOutcome, ReviewAction, ReviewItem, ReviewQueue};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Resolution chosen by the reviewer
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub action: ReviewAction,

    /// Edited record to commit instead of the proposal as submitted
    #[serde(default)]
    #[validate(nested)]
    pub record: Option<QuestionRecord>,
}

/// Pending indices and the first proposal to review
pub async fn review_queue(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<ReviewQueue>>> {
    let queue = state.desk.review_queue().await?;
    let message = match &queue.current {
        Some(item) => format!(
            "Pending proposal: question {} of {} ({} remaining).",
            item.position, item.total, queue.remaining
        ),
        None => "No translation proposals pending review.".to_string(),
    };

    Ok(Json(SuccessResponse::with_data(message, queue)))
}

/// A specific pending proposal
pub async fn review_item(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<SuccessResponse<ReviewItem>>> {
    let item = state.desk.review_item(index).await?;
    Ok(Json(SuccessResponse::with_data(
        format!("Proposal for question {}.", item.position),
        item,
    )))
}

/// Commit or reject a pending proposal
pub async fn resolve_proposal(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Json(payload): Json<ResolveRequest>,
) -> ApiResult<Json<SuccessResponse<ResolveOutcome>>> {
    payload.validate()?;
    info!("Resolving proposal {} with {}", index, payload.action);

    let outcome = state
        .desk
        .resolve_proposal(index, payload.action, payload.record)
        .await?;

    let message = match outcome.action {
        ReviewAction::Commit => format!("Translation committed for question {}.", index + 1),
        ReviewAction::Reject => format!(
            "Proposal rejected for question {} (verified version kept).",
            index + 1
        ),
    };

    Ok(Json(SuccessResponse::with_data(message, outcome)))
}
