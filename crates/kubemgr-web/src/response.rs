//! JSON response envelope: `{"status": <code>, "message": "...", "data": ...}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ApiResponse<T> {
    pub(crate) status: u16,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<T>,
}

pub(crate) fn json<T: Serialize>(code: StatusCode, message: &str, data: Option<T>) -> Response {
    let body = ApiResponse {
        status: code.as_u16(),
        message: message.to_owned(),
        data,
    };
    (code, Json(body)).into_response()
}

pub(crate) fn ok<T: Serialize>(data: T) -> Response {
    json(StatusCode::OK, "Success", Some(data))
}

pub(crate) fn internal_error(message: &str) -> Response {
    json::<()>(StatusCode::INTERNAL_SERVER_ERROR, message, None)
}

pub(crate) fn bad_request(message: &str) -> Response {
    json::<()>(StatusCode::BAD_REQUEST, message, None)
}

pub(crate) fn not_found(message: &str) -> Response {
    json::<()>(StatusCode::NOT_FOUND, message, None)
}
