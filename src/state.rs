//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::Settings;
use crate::store::TranslationStores;
use crate::translation::TranslationDesk;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Submission and review operations over the JSON stores
    pub desk: TranslationDesk,

    /// Bearer token guarding the review routes
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            desk: TranslationDesk::new(TranslationStores::new(&settings.storage)),
            admin_token: settings.admin.token.clone(),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
