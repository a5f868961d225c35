//! Route table.

use axum::Router;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::access_log::AccessLogLayer;
use crate::handlers;
use crate::state::SharedState;

pub(crate) fn build_router(state: SharedState) -> Router {
    // Generated files, served as-is for debugging.
    let out_files = ServeDir::new(&state.out_dir);

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/health", get(handlers::handle_health))
        .route("/namespaces/{name}", get(handlers::handle_namespace))
        .route("/api/v1/namespaces", get(handlers::handle_namespaces))
        .route("/api-docs/openapi.json", get(handlers::handle_openapi))
        .route("/static/{*path}", get(handlers::serve_static))
        .nest_service("/out", out_files)
        .with_state(state)
        .layer(AccessLogLayer)
        .layer(CompressionLayer::new())
}
