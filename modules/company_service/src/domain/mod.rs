//! Domain layer - business logic and services

pub mod authentication;
pub mod companies;
pub mod employees;
pub mod paging;
pub mod repository;
pub mod service;
pub mod validation;

pub use authentication::AuthenticationService;
pub use companies::CompanyService;
pub use employees::EmployeeService;
pub use paging::{EmployeeParameters, PageMetadata, PagedList};
pub use repository::{CompanyRepository, EmployeeRepository, RepositoryManager, UserRepository};
pub use service::ServiceManager;
