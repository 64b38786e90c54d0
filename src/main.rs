//! Quiz Translation Desk
//!
//! Lets a community propose French translations of German quiz questions and
//! lets an administrator commit or reject each proposal.
//!
//! STORES: three JSON files in the data directory:
//! - `input_data.json`: source questions (read-only)
//! - `proposed_translations_fr.json`: pending proposals by question index
//! - `translated_data_fr.json`: verified translations, written on commit

mod auth;
mod config;
mod error;
mod models;
mod routes;
mod state;
mod store;
mod translation;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Quiz Translation Desk...");

    // Load configuration
    let settings = Settings::load()?;
    info!(
        "📋 Configuration loaded (data dir: {})",
        settings.storage.data_dir.display()
    );

    if settings.admin.token.is_none() {
        warn!("⚠️  ADMIN_TOKEN not set, review routes are open to everyone");
    }

    let state = Arc::new(AppState::new(&settings));

    // Nothing can be served without the source questions
    let questions = state.desk.question_count().await?;
    if questions == 0 {
        warn!("⚠️  Source file contains no questions");
    }
    info!("✅ Loaded {} source questions", questions);

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Submission ───");
    info!("   GET  /api/submissions/:index          - Question, verified version and draft");
    info!("   POST /api/submissions/:index          - Submit a translation proposal");
    info!("   GET  /api/submissions/:index/next     - Move to next question");
    info!("   GET  /api/submissions/:index/previous - Move to previous question");
    info!("");
    info!("   ─── Review (Admin) ───");
    info!("   GET  /api/review                      - Pending proposals");
    info!("   GET  /api/review/:index               - One pending proposal");
    info!("   POST /api/review/:index               - Commit or reject a proposal");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quiz_translation_desk=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
