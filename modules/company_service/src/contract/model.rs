//! Contract models for the company service
//!
//! These models are transport-agnostic and shared by the domain, storage and
//! REST layers. NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A company owning a set of employees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    /// Company identifier
    pub id: Uuid,
    /// Display name (at most 60 characters)
    pub name: String,
    /// Street address (at most 60 characters)
    pub address: String,
    /// Country
    pub country: String,
}

impl Company {
    /// Address and country joined the way responses present them
    pub fn full_address(&self) -> String {
        format!("{} {}", self.address, self.country)
    }
}

/// An employee scoped to exactly one company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
    /// Owning company
    pub company_id: Uuid,
}

/// Registered API user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub refresh_token_expiry: Option<DateTime<Utc>>,
}

/// Role granted to a manager
pub const ROLE_MANAGER: &str = "Manager";

/// Role granted to an administrator
pub const ROLE_ADMINISTRATOR: &str = "Administrator";

/// Company payload as received, before validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyDraft {
    pub name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub employees: Vec<EmployeeDraft>,
}

/// Employee payload as received, before validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeDraft {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

/// Validated company payload used for create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInput {
    pub name: String,
    pub address: String,
    pub country: String,
    /// Employees created together with the company
    pub employees: Vec<EmployeeInput>,
}

/// Validated employee payload used for create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInput {
    pub name: String,
    pub age: i32,
    pub position: String,
}

impl EmployeeInput {
    /// Materialize a new employee row for the given company
    pub fn into_employee(self, company_id: Uuid) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: self.name,
            age: self.age,
            position: self.position,
            company_id,
        }
    }
}

/// Registration request after transport decoding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registration {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub roles: Vec<String>,
}

/// Access token plus the refresh token that can renew it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authenticated caller resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_name: String,
    pub roles: Vec<String>,
}

impl Principal {
    /// Whether the caller carries the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
