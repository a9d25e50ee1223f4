//! `Cache-Control` and ETag validation for company reads

use crate::config::CachingConfig;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

/// Strong validator for a response body
pub fn entity_tag(body: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

fn matches_if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == "*" || tag == etag)
}

/// Adds cache headers to successful GET responses and answers conditional
/// requests with 304 when the entity tag still matches.
pub async fn cache_headers(
    State(config): State<CachingConfig>,
    req: Request,
    next: Next,
) -> Response {
    if req.method() != Method::GET {
        return next.run(req).await;
    }

    let request_headers = req.headers().clone();
    let response = next.run(req).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer response body for ETag");
            return super::error::Problem::internal().into_response();
        }
    };

    let etag = entity_tag(&bytes);
    let cache_control = format!("public, max-age={}", config.max_age_secs);
    let (Ok(etag_value), Ok(cache_value)) = (
        HeaderValue::from_str(&etag),
        HeaderValue::from_str(&cache_control),
    ) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    parts.headers.insert(header::CACHE_CONTROL, cache_value.clone());
    parts.headers.insert(header::ETAG, etag_value.clone());

    if matches_if_none_match(&request_headers, &etag) {
        return (
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag_value), (header::CACHE_CONTROL, cache_value)],
        )
            .into_response();
    }

    Response::from_parts(parts, Body::from(bytes))
}
