//! Contract error types for the company service
//!
//! These errors are transport-agnostic; the REST layer maps them to
//! Problem Details.

use std::collections::BTreeMap;

/// Field name to the validation messages raised for it
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Company service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Company, employee or user not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (company, employee)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Request body failed validation
    #[error("validation failed for {}", field_list(.errors))]
    Validation {
        /// Messages keyed by field
        errors: FieldErrors,
    },
    /// Identity rejected a registration (policy, duplicates, unknown roles)
    #[error("registration rejected for {}", field_list(.errors))]
    Registration {
        /// Messages keyed by the failing rule
        errors: FieldErrors,
    },
    /// Request is structurally wrong (null body, bad id list, bad range)
    #[error("bad request: {message}")]
    BadRequest {
        /// What was wrong
        message: String,
    },
    /// Credentials or token rejected
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Why the caller was rejected
        message: String,
    },
    /// Authenticated caller lacks a role
    #[error("forbidden: {message}")]
    Forbidden {
        /// Missing permission
        message: String,
    },
    /// Internal error
    #[error("internal error")]
    Internal,
}

impl ServiceError {
    pub fn company_not_found(id: uuid::Uuid) -> Self {
        Self::NotFound {
            resource: "Company".to_string(),
            id: id.to_string(),
        }
    }

    pub fn employee_not_found(id: uuid::Uuid) -> Self {
        Self::NotFound {
            resource: "Employee".to_string(),
            id: id.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        Self::Validation { errors }
    }
}

fn field_list(errors: &FieldErrors) -> String {
    errors.keys().cloned().collect::<Vec<_>>().join(", ")
}

/// Log an infrastructure failure and collapse it into [`ServiceError::Internal`]
pub(crate) fn internal(err: anyhow::Error) -> ServiceError {
    tracing::error!(error = ?err, "repository call failed");
    ServiceError::Internal
}
