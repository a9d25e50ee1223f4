//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::{FieldErrors, ServiceError};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Validation messages keyed by field
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            errors: FieldErrors::new(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request").with_detail(detail)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .with_detail("Internal Server Error")
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add instance URI
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
            )],
            Json(self),
        )
            .into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: ServiceError) -> Problem {
    match error {
        ServiceError::NotFound { resource, id } => {
            let detail = match resource.as_str() {
                "Company" => format!("The company with id: {id} doesn't exist in the database."),
                _ => format!("{resource} with id: {id} doesn't exist in the database."),
            };
            Problem::new(StatusCode::NOT_FOUND, "Not Found").with_detail(detail)
        }

        ServiceError::Validation { errors } => Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unprocessable Entity",
        )
        .with_detail("One or more validation errors occurred.")
        .with_errors(errors),

        ServiceError::Registration { errors } => {
            Problem::bad_request("User registration was rejected.").with_errors(errors)
        }

        ServiceError::BadRequest { message } => Problem::bad_request(message),

        ServiceError::Unauthorized { message } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized").with_detail(message)
        }

        ServiceError::Forbidden { message } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(message)
        }

        ServiceError::Internal => Problem::internal(),
    }
}
