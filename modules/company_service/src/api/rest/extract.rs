//! Custom Axum extractors
//!
//! Rejections are reported as Problem Details instead of axum's plain-text
//! defaults.

use super::error::{map_domain_error, Problem};
use crate::contract::{Principal, ServiceError};
use crate::domain::ServiceManager;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// JSON body that must be present and non-null.
///
/// Unreadable bodies and a literal `null` both answer 400.
pub struct JsonBody<T>(pub T);

fn type_label<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Option<T>>::from_request(req, state).await {
            Ok(Json(Some(value))) => Ok(Self(value)),
            Ok(Json(None)) => Err(Problem::bad_request(format!(
                "{} object sent from client is null.",
                type_label::<T>()
            ))),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "request body rejected");
                Err(Problem::bad_request(rejection.body_text()))
            }
        }
    }
}

/// Path parameters with a Problem rejection
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| Problem::bad_request(rejection.body_text()))
    }
}

/// Query string with a Problem rejection
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| Problem::bad_request(rejection.body_text()))
    }
}

/// Caller authenticated by a bearer access token
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// 403 unless the caller holds `role`
    pub fn require_role(&self, role: &str) -> Result<(), Problem> {
        if self.0.has_role(role) {
            return Ok(());
        }
        tracing::warn!(user_name = %self.0.user_name, role, "caller lacks required role");
        Err(map_domain_error(ServiceError::Forbidden {
            message: format!("The '{role}' role is required for this operation."),
        }))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let services = parts
            .extensions
            .get::<Arc<ServiceManager>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("service manager extension is not installed");
                Problem::internal()
            })?;

        let token = bearer_token(parts).ok_or_else(|| {
            map_domain_error(ServiceError::Unauthorized {
                message: "Bearer token is missing, expired or invalid.".to_string(),
            })
        })?;

        services
            .authentication()
            .authenticate(token)
            .map(Self)
            .map_err(map_domain_error)
    }
}
