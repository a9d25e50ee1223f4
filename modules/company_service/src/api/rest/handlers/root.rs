//! API root and unknown routes

use crate::api::rest::{
    dto::Link,
    error::Problem,
    negotiation::API_ROOT_MEDIA_TYPE,
    shaping::root_links,
};
use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

/// Entry links when the API root media type is requested; 204 otherwise
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "Root links", body = [Link]),
        (status = 204, description = "Root media type not requested")
    ),
    tag = "root"
)]
pub async fn get_root(headers: HeaderMap) -> Response {
    let wants_root = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.to_ascii_lowercase().contains(API_ROOT_MEDIA_TYPE));

    if !wants_root {
        return StatusCode::NO_CONTENT.into_response();
    }

    (
        [(header::CONTENT_TYPE, HeaderValue::from_static(API_ROOT_MEDIA_TYPE))],
        Json(root_links()),
    )
        .into_response()
}

pub async fn not_found(uri: Uri) -> Problem {
    Problem::new(StatusCode::NOT_FOUND, "Not Found")
        .with_detail("No resource matches the requested path.")
        .with_instance(uri.path())
}
