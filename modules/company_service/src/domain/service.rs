//! Domain service aggregate handed to the HTTP layer

use super::authentication::AuthenticationService;
use super::companies::CompanyService;
use super::employees::EmployeeService;
use super::repository::RepositoryManager;
use crate::config::Config;

/// Entry point bundling the company, employee and authentication services
#[derive(Clone)]
pub struct ServiceManager {
    companies: CompanyService,
    employees: EmployeeService,
    authentication: AuthenticationService,
}

impl ServiceManager {
    /// Build every service over one repository manager
    pub fn new(repos: RepositoryManager, config: &Config) -> Self {
        Self {
            companies: CompanyService::new(repos.clone()),
            employees: EmployeeService::new(repos.clone(), config.paging.max_page_size),
            authentication: AuthenticationService::new(repos, config.jwt.clone()),
        }
    }

    pub fn companies(&self) -> &CompanyService {
        &self.companies
    }

    pub fn employees(&self) -> &EmployeeService {
        &self.employees
    }

    pub fn authentication(&self) -> &AuthenticationService {
        &self.authentication
    }
}
