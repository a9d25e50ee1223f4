//! Contract layer - transport-agnostic models and errors
//!
//! NO serde derives on models - these are pure domain types.

pub mod error;
pub mod model;

pub use error::{FieldErrors, ServiceError};
pub use model::{
    Company, CompanyDraft, CompanyInput, Employee, EmployeeDraft, EmployeeInput, Principal,
    Registration, TokenPair, User, ROLE_ADMINISTRATOR, ROLE_MANAGER,
};
