//! Admin authorization
//!
//! The review routes accept a request only if it carries the configured
//! admin token as a bearer credential. Without a configured token they are open.

use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::warn;

pub async fn require_admin(
    State(state): State<SharedState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let TypedHeader(credentials) = bearer
        .ok_or_else(|| AppError::Unauthorized("Missing admin bearer token".to_string()))?;

    if credentials.token() != expected {
        warn!("Rejected review request with an invalid admin token");
        return Err(AppError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(next.run(request).await)
}
