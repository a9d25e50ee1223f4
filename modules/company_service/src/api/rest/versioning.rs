//! API versioning through the `api-version` header or query parameter

use super::error::Problem;
use axum::{
    extract::{FromRequestParts, Query, Request},
    http::{request::Parts, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::convert::Infallible;

pub const API_VERSION_HEADER: HeaderName = HeaderName::from_static("api-version");
pub const SUPPORTED_VERSIONS_HEADER: HeaderName = HeaderName::from_static("api-supported-versions");
const SUPPORTED_VERSIONS: &str = "1.0, 2.0";

/// Negotiated API version; 1.0 when the client does not ask for one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "1.0" => Some(Self::V1),
            "2" | "2.0" => Some(Self::V2),
            _ => None,
        }
    }
}

fn requested_version(req: &Request) -> Option<String> {
    if let Some(value) = req.headers().get(API_VERSION_HEADER) {
        return Some(value.to_str().unwrap_or_default().to_string());
    }
    Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(params)| params.get("api-version").cloned())
}

/// Resolve the requested version and advertise the supported ones
pub async fn api_version(mut req: Request, next: Next) -> Response {
    let version = match requested_version(&req) {
        None => ApiVersion::default(),
        Some(raw) => match ApiVersion::parse(&raw) {
            Some(version) => version,
            None => {
                tracing::warn!(requested = %raw, "unsupported api version");
                let mut response = Problem::bad_request(format!(
                    "The HTTP resource does not support the API version '{raw}'."
                ))
                .into_response();
                advertise(&mut response);
                return response;
            }
        },
    };

    req.extensions_mut().insert(version);
    let mut response = next.run(req).await;
    advertise(&mut response);
    response
}

fn advertise(response: &mut Response) {
    response.headers_mut().insert(
        SUPPORTED_VERSIONS_HEADER,
        HeaderValue::from_static(SUPPORTED_VERSIONS),
    );
}

impl<S> FromRequestParts<S> for ApiVersion
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<ApiVersion>().copied().unwrap_or_default())
    }
}
