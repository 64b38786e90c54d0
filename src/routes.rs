//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod review;
mod submission;

use crate::auth::require_admin;
use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Admin-only routes
    let review_routes = Router::new()
        .route("/api/review", get(review::review_queue))
        .route(
            "/api/review/{index}",
            get(review::review_item).post(review::resolve_proposal),
        )
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Submission routes
        .route(
            "/api/submissions/{index}",
            get(submission::get_submission).post(submission::submit_proposal),
        )
        .route("/api/submissions/{index}/next", get(submission::next_question))
        .route("/api/submissions/{index}/previous", get(submission::previous_question))

        .merge(review_routes)

        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    layer
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check(State(state): State<SharedState>) -> axum::Json<serde_json::Value> {
    let questions = state.desk.question_count().await.ok();
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "sourceLoaded": questions.is_some(),
        "questions": questions,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(admin_token: Option<&str>) -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let source = json!([
            { "question": "Wer?", "correct": "Ich", "incorrect_1": "Du", "incorrect_2": "Er" },
            { "question": "Wo?", "correct": "Hier", "incorrect_1": "Dort", "incorrect_2": "Nirgends" }
        ]);
        std::fs::write(dir.path().join("input_data.json"), source.to_string()).unwrap();

        let mut settings = Settings::default();
        settings.storage.data_dir = dir.path().to_path_buf();
        settings.storage.cache_ttl = Duration::ZERO;
        settings.admin.token = admin_token.map(str::to_string);

        let state = Arc::new(AppState::new(&settings));
        (dir, create_router(state, &settings))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn record(question: &str) -> Value {
        json!({ "question": question, "correct": "Moi", "incorrect_1": "Toi", "incorrect_2": "Lui" })
    }

    #[tokio::test]
    async fn test_health_reports_source() {
        let (_dir, app) = app(None);
        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["questions"], 2);
    }

    #[tokio::test]
    async fn test_submission_view_and_submit() {
        let (_dir, app) = app(None);

        let response = app.clone().oneshot(get_request("/api/submissions/0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["source"]["question"], "Wer?");
        assert_eq!(body["data"]["draft"]["question"], "Traduction manquante...");
        assert_eq!(body["data"]["hasProposal"], false);

        let response = app
            .oneshot(json_request("POST", "/api/submissions/1", record("Où ?")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["completed"], true);
        assert_eq!(body["data"]["cursor"]["index"], 1);
    }

    #[tokio::test]
    async fn test_submit_out_of_range_is_not_found() {
        let (_dir, app) = app(None);
        let response = app
            .oneshot(json_request("POST", "/api/submissions/7", record("?")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INDEX_OUT_OF_RANGE");
    }

    #[tokio::test]
    async fn test_submit_oversized_field_is_rejected() {
        let (dir, app) = app(None);
        let mut body = record("Trop long ?");
        body["correct"] = Value::String("x".repeat(5000));

        let response = app
            .oneshot(json_request("POST", "/api/submissions/0", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("proposed_translations_fr.json").exists());
    }

    #[tokio::test]
    async fn test_navigation() {
        let (_dir, app) = app(None);
        let response = app.oneshot(get_request("/api/submissions/1/next")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"], json!({ "index": 1, "total": 2 }));
    }

    #[tokio::test]
    async fn test_review_reports_nothing_pending() {
        let (_dir, app) = app(None);
        let response = app.oneshot(get_request("/api/review")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["pending"], json!([]));
        assert_eq!(body["data"]["current"], Value::Null);
        assert_eq!(body["message"], "No translation proposals pending review.");
    }

    #[tokio::test]
    async fn test_review_requires_admin_token() {
        let (_dir, app) = app(Some("letmein"));

        let response = app.clone().oneshot(get_request("/api/review")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let wrong = Request::builder()
            .uri("/api/review")
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(wrong).await.unwrap().status(), StatusCode::UNAUTHORIZED);

        let right = Request::builder()
            .uri("/api/review")
            .header(header::AUTHORIZATION, "Bearer letmein")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.oneshot(right).await.unwrap().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_submissions_stay_open_with_admin_token() {
        let (_dir, app) = app(Some("letmein"));
        let response = app.oneshot(get_request("/api/submissions/0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_commit_flow() {
        let (dir, app) = app(None);
        app.clone()
            .oneshot(json_request("POST", "/api/submissions/0", record("Qui ?")))
            .await
            .unwrap();

        let edited = record("Qui donc ?");
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/review/0",
                json!({ "action": "commit", "record": edited }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["verified"], edited);
        assert_eq!(body["data"]["remaining"], 0);

        let verified: Value = serde_json::from_slice(
            &std::fs::read(dir.path().join("translated_data_fr.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(verified[0], edited);

        let response = app
            .oneshot(json_request("POST", "/api/review/0", json!({ "action": "reject" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
