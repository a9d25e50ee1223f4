//! Data Transfer Objects for the REST API
//!
//! Every payload is camelCase JSON. Request fields are optional so that
//! missing values surface as 422 validation errors instead of parse failures.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ===== Companies =====

/// Company as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    /// Address and country joined by a space
    pub full_address: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForCreationDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    /// Employees created together with the company
    #[serde(default)]
    pub employees: Option<Vec<EmployeeForCreationDto>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForUpdateDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    /// New employees added to the company
    #[serde(default)]
    pub employees: Option<Vec<EmployeeForCreationDto>>,
}

// ===== Employees =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForCreationDto {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForUpdateDto {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

/// Query string of the employee list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeListQuery {
    /// 1-based page number (default 1)
    #[serde(alias = "PageNumber")]
    pub page_number: Option<u64>,
    /// Page size, capped at the configured maximum (default 10)
    #[serde(alias = "PageSize")]
    pub page_size: Option<u64>,
    #[serde(alias = "MinAge")]
    pub min_age: Option<i32>,
    #[serde(alias = "MaxAge")]
    pub max_age: Option<i32>,
    /// Case-insensitive substring of the employee name
    #[serde(alias = "SearchTerm")]
    pub search_term: Option<String>,
    /// Sort expression such as `name desc, age`
    #[serde(alias = "OrderBy")]
    pub order_by: Option<String>,
    /// Comma separated properties to keep in each item
    #[serde(alias = "Fields")]
    pub fields: Option<String>,
}

/// Serialized into the `X-Pagination` response header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaginationHeader {
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

// ===== Hypermedia =====

/// Hypermedia control attached to HATEOAS responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: &str, method: &str) -> Self {
        Self {
            href: href.into(),
            rel: rel.to_string(),
            method: method.to_string(),
        }
    }
}

// ===== Authentication =====

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserForRegistrationDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Role names, e.g. `Manager` or `Administrator`
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserForAuthenticationDto {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

/// Access token plus refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub access_token: String,
    pub refresh_token: String,
}
