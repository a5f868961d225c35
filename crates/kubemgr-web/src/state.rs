//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;

/// Immutable runtime configuration shared by all handlers.
pub(crate) struct AppConfig {
    /// Service name, shown in the page title.
    pub(crate) name: String,
    /// Directory holding one sub-directory per namespace.
    pub(crate) out_dir: PathBuf,
}

pub(crate) type SharedState = Arc<AppConfig>;

pub(crate) type AppState = State<SharedState>;
