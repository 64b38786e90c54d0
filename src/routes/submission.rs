//! Submission route handlers
//!
//! Community side: view a question, propose a translation, move between
//! questions. The client carries its own position in the URL.

use crate::error::ApiResult;
use crate::models::{QuestionRecord, SuccessResponse};
use crate::state::SharedState;
use crate::translation::{Direction, SubmissionCursor, SubmissionView, SubmitOutcome};
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;
use validator::Validate;

/// Get the source, verified and draft records for a question
pub async fn get_submission(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<SuccessResponse<SubmissionView>>> {
    debug!("Loading submission view for index {}", index);
    let view = state.desk.submission_view(index).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Question {} of {}.", view.position, view.cursor.total),
        view,
    )))
}

/// Store a proposal and return the advanced cursor
pub async fn submit_proposal(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Json(payload): Json<QuestionRecord>,
) -> ApiResult<Json<SuccessResponse<SubmitOutcome>>> {
    payload.validate()?;

    let outcome = state.desk.submit_proposal(index, payload).await?;
    let message = if outcome.step.completed {
        "Proposal saved. You have reached the end of the question list."
    } else {
        "Proposal saved for review."
    };

    Ok(Json(SuccessResponse::with_data(message, outcome)))
}

/// Move to the next question without saving
pub async fn next_question(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<SuccessResponse<SubmissionCursor>>> {
    let cursor = state.desk.navigate(index, Direction::Next).await?;
    Ok(Json(SuccessResponse::with_data("Moved to next question.", cursor)))
}

/// Move to the previous question without saving
pub async fn previous_question(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<SuccessResponse<SubmissionCursor>>> {
    let cursor = state.desk.navigate(index, Direction::Previous).await?;
    Ok(Json(SuccessResponse::with_data("Moved to previous question.", cursor)))
}
