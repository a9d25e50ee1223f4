//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use super::paging::{EmployeeParameters, PagedList};
use crate::contract::{Company, Employee, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Repository for companies
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies ordered by name
    async fn find_all(&self) -> Result<Vec<Company>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>>;

    /// Companies whose id is in `ids`; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>>;

    /// Insert a company together with its initial employees in one unit of work
    async fn create(&self, company: &Company, employees: &[Employee]) -> Result<()>;

    /// Insert several companies, each with its employees, in one unit of work
    async fn create_many(&self, companies: &[(Company, Vec<Employee>)]) -> Result<()>;

    /// Update the company row and add `new_employees` in one unit of work
    async fn update(&self, company: &Company, new_employees: &[Employee]) -> Result<()>;

    /// Delete a company; its employees go with it
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Repository for employees, always scoped to a company
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Filtered, searched, ordered and paged employees of one company
    async fn find_page(
        &self,
        company_id: Uuid,
        params: &EmployeeParameters,
    ) -> Result<PagedList<Employee>>;

    async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>>;

    async fn create(&self, employee: &Employee) -> Result<()>;

    async fn update(&self, employee: &Employee) -> Result<()>;

    async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<()>;
}

/// Repository for users and their roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user and grant the named roles
    async fn create(&self, user: &User, roles: &[String]) -> Result<()>;

    /// Role names granted to a user
    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<String>>;

    /// Which of `names` exist as roles
    async fn existing_roles(&self, names: &[String]) -> Result<Vec<String>>;

    /// Store a refresh token; `expiry` of `None` keeps the current expiry
    async fn save_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<()>;
}

/// Aggregation point handing per-entity repositories to the services
#[derive(Clone)]
pub struct RepositoryManager {
    company: Arc<dyn CompanyRepository>,
    employee: Arc<dyn EmployeeRepository>,
    user: Arc<dyn UserRepository>,
}

impl RepositoryManager {
    pub fn new(
        company: Arc<dyn CompanyRepository>,
        employee: Arc<dyn EmployeeRepository>,
        user: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            company,
            employee,
            user,
        }
    }

    pub fn company(&self) -> &dyn CompanyRepository {
        self.company.as_ref()
    }

    pub fn employee(&self) -> &dyn EmployeeRepository {
        self.employee.as_ref()
    }

    pub fn user(&self) -> &dyn UserRepository {
        self.user.as_ref()
    }
}
