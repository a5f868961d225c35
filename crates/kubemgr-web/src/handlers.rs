//! HTTP request handlers: health, index page, namespace listing, static assets.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::OpenApi;

use kubemgr_core::filter::{FilterHandler, FilterOutcome};
use kubemgr_core::page::Page;
use kubemgr_core::render::{IndexPage, NamespacePage};
use kubemgr_core::store::{self, NamespaceInfo, StoreError};

use crate::openapi::ApiDoc;
use crate::response;
use crate::state::{AppState, SharedState};

// ============================================================
// Embedded static assets (css/, js/)
// ============================================================

#[derive(Embed)]
#[folder = "assets"]
struct StaticAssets;

// ============================================================
// Health
// ============================================================

#[derive(Serialize, utoipa::ToSchema)]
pub(crate) struct HealthStatus {
    status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy; wrapped in the response envelope", body = HealthStatus)
    )
)]
pub(crate) async fn handle_health() -> Response {
    response::ok(HealthStatus {
        status: "ok".to_owned(),
    })
}

// ============================================================
// Index page
// ============================================================

#[derive(Deserialize, utoipa::IntoParams)]
pub(crate) struct FilterQuery {
    /// Case-insensitive substring matched against namespace names.
    q: Option<String>,
}

pub(crate) async fn handle_index(
    State(state): AppState,
    Query(query): Query<FilterQuery>,
) -> Response {
    let namespaces = match load_namespaces(&state).await {
        Ok(nss) => nss,
        Err(resp) => return resp,
    };

    let mut page = Page::from_namespaces(&namespaces);
    filter_page(&mut page, query.q.as_deref());

    let title = format!("Namespaces · {}", state.name);
    let html = IndexPage {
        title: &title,
        route: "index",
        heading: "Namespaces",
        subheading: "Read from out/ and manage generated Kubernetes configs.",
        page: &page,
    }
    .render();
    Html(html).into_response()
}

// ============================================================
// Namespace file listing
// ============================================================

pub(crate) async fn handle_namespace(
    State(state): AppState,
    Path(name): Path<String>,
) -> Response {
    let out_dir = state.out_dir.clone();
    let ns = name.clone();
    let files = match tokio::task::spawn_blocking(move || store::list_files(&out_dir, &ns)).await
    {
        Ok(Ok(files)) => files,
        Ok(Err(StoreError::InvalidName(_))) => {
            return response::bad_request("invalid namespace name");
        }
        Ok(Err(StoreError::Read(_, e))) if e.kind() == std::io::ErrorKind::NotFound => {
            return response::not_found("namespace not found");
        }
        Ok(Err(e)) => {
            error!(namespace = %name, error = %e, "failed to list namespace files");
            return response::internal_error(&e.to_string());
        }
        Err(e) => {
            error!(error = %e, "namespace file listing task failed");
            return response::internal_error("internal error");
        }
    };

    let title = format!("{name} · {}", state.name);
    let html = NamespacePage {
        title: &title,
        namespace: &name,
        files: &files,
    }
    .render();
    Html(html).into_response()
}

// ============================================================
// Namespaces API
// ============================================================

#[derive(Serialize, utoipa::ToSchema)]
pub(crate) struct NamespaceEntry {
    name: String,
    item_count: usize,
    /// Latest file modification as `YYYY-MM-DD HH:MM`, empty when there are no files.
    updated_human: String,
    /// Whether the namespace matches the query.
    visible: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub(crate) struct NamespaceList {
    query: String,
    shown: usize,
    total: usize,
    namespaces: Vec<NamespaceEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v1/namespaces",
    params(FilterQuery),
    responses(
        (status = 200, description = "Namespaces with filter visibility; wrapped in the response envelope", body = NamespaceList),
        (status = 500, description = "Output directory could not be read")
    )
)]
pub(crate) async fn handle_namespaces(
    State(state): AppState,
    Query(query): Query<FilterQuery>,
) -> Response {
    let namespaces = match load_namespaces(&state).await {
        Ok(nss) => nss,
        Err(resp) => return resp,
    };

    let mut page = Page::from_namespaces(&namespaces);
    let outcome = filter_page(&mut page, query.q.as_deref());

    let entries = namespaces
        .into_iter()
        .zip(page.tiles())
        .map(|(ns, tile)| NamespaceEntry {
            name: ns.name,
            item_count: ns.item_count,
            updated_human: ns.updated_human,
            visible: tile.is_visible(),
        })
        .collect();

    response::ok(NamespaceList {
        query: query.q.unwrap_or_default(),
        shown: outcome.shown,
        total: outcome.total(),
        namespaces: entries,
    })
}

/// Runs one filter pass when a query was given. Without one, every tile stays shown.
fn filter_page(page: &mut Page, q: Option<&str>) -> FilterOutcome {
    let total = page.tiles().len();
    match (q, FilterHandler::attach(page)) {
        (Some(q), Some(mut filter)) => filter.on_input(q),
        _ => FilterOutcome {
            shown: total,
            hidden: 0,
        },
    }
}

/// Directory walks block, so they run on the blocking pool.
async fn load_namespaces(state: &SharedState) -> Result<Vec<NamespaceInfo>, Response> {
    let out_dir = state.out_dir.clone();
    tokio::task::spawn_blocking(move || store::list_namespaces(&out_dir))
        .await
        .map_err(|e| {
            error!(error = %e, "namespace listing task failed");
            response::internal_error("internal error")
        })?
        .map_err(|e| {
            error!(error = %e, "failed to list namespaces");
            response::internal_error(&e.to_string())
        })
}

// ============================================================
// Static files
// ============================================================

pub(crate) async fn serve_static(Path(path): Path<String>) -> Response {
    match StaticAssets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_owned())],
                Body::from(file.data.into_owned()),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

// ============================================================
// OpenAPI document
// ============================================================

pub(crate) async fn handle_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
