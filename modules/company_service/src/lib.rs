//! Company Employees Service Module
//!
//! REST API over companies and their employees: paging, filtering, data
//! shaping, hypermedia links, versioning, caching headers, rate limiting and
//! JWT bearer authentication with refresh tokens.

// Public exports
pub mod contract;
pub use contract::{
    Company, CompanyDraft, Employee, EmployeeDraft, Principal, Registration, ServiceError,
    TokenPair, User,
};

pub mod module;
pub use module::CompanyServiceModule;

pub mod config;
pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
