//! Shared test fixtures: in-memory repositories and service wiring
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use company_service::config::Config;
use company_service::contract::{Company, Employee, User, ROLE_ADMINISTRATOR, ROLE_MANAGER};
use company_service::domain::paging::{SortField, SortKey};
use company_service::domain::{
    CompanyRepository, EmployeeParameters, EmployeeRepository, PagedList, RepositoryManager,
    ServiceManager, UserRepository,
};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-bytes";

/// Configuration with a signing secret and an in-memory database
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.jwt.secret = TEST_SECRET.to_string();
    config.database.url = "sqlite::memory:".to_string();
    config
}

/// Backing store shared by the mock repositories
#[derive(Default)]
pub struct MemoryStore {
    pub companies: RwLock<HashMap<Uuid, Company>>,
    pub employees: RwLock<HashMap<Uuid, Employee>>,
    pub users: RwLock<HashMap<Uuid, User>>,
    pub user_roles: RwLock<Vec<(Uuid, String)>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn company_count(&self) -> usize {
        self.companies.read().len()
    }

    pub fn employees_of(&self, company_id: Uuid) -> Vec<Employee> {
        self.employees
            .read()
            .values()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect()
    }

    pub fn user(&self, user_name: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|u| u.user_name == user_name)
            .cloned()
    }
}

pub mod mocks {
    use super::*;

    #[derive(Clone)]
    pub struct MockCompanyRepo {
        store: Arc<MemoryStore>,
    }

    impl MockCompanyRepo {
        pub fn new(store: Arc<MemoryStore>) -> Self {
            Self { store }
        }

        fn insert(&self, company: &Company, employees: &[Employee]) {
            self.store
                .companies
                .write()
                .insert(company.id, company.clone());
            let mut rows = self.store.employees.write();
            for employee in employees {
                rows.insert(employee.id, employee.clone());
            }
        }
    }

    #[async_trait]
    impl CompanyRepository for MockCompanyRepo {
        async fn find_all(&self) -> Result<Vec<Company>> {
            let mut all: Vec<Company> = self.store.companies.read().values().cloned().collect();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(all)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
            Ok(self.store.companies.read().get(&id).cloned())
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>> {
            let companies = self.store.companies.read();
            Ok(ids.iter().filter_map(|id| companies.get(id).cloned()).collect())
        }

        async fn create(&self, company: &Company, employees: &[Employee]) -> Result<()> {
            self.insert(company, employees);
            Ok(())
        }

        async fn create_many(&self, companies: &[(Company, Vec<Employee>)]) -> Result<()> {
            for (company, employees) in companies {
                self.insert(company, employees);
            }
            Ok(())
        }

        async fn update(&self, company: &Company, new_employees: &[Employee]) -> Result<()> {
            self.insert(company, new_employees);
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.store.companies.write().remove(&id);
            self.store
                .employees
                .write()
                .retain(|_, employee| employee.company_id != id);
            Ok(())
        }
    }

    #[derive(Clone)]
    pub struct MockEmployeeRepo {
        store: Arc<MemoryStore>,
    }

    impl MockEmployeeRepo {
        pub fn new(store: Arc<MemoryStore>) -> Self {
            Self { store }
        }
    }

    fn compare(a: &Employee, b: &Employee, keys: &[SortKey]) -> Ordering {
        keys.iter()
            .map(|key| {
                let ordering = match key.field {
                    SortField::Name => a.name.cmp(&b.name),
                    SortField::Age => a.age.cmp(&b.age),
                    SortField::Position => a.position.cmp(&b.position),
                };
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }

    #[async_trait]
    impl EmployeeRepository for MockEmployeeRepo {
        async fn find_page(
            &self,
            company_id: Uuid,
            params: &EmployeeParameters,
        ) -> Result<PagedList<Employee>> {
            let search = params.search();
            let mut matching: Vec<Employee> = self
                .store
                .employees_of(company_id)
                .into_iter()
                .filter(|e| e.age >= params.min_age && e.age <= params.max_age)
                .filter(|e| {
                    search
                        .as_deref()
                        .map_or(true, |term| e.name.to_lowercase().contains(term))
                })
                .collect();

            let keys = params.sort_keys();
            matching.sort_by(|a, b| compare(a, b, &keys));
            let total = matching.len() as u64;
            let skip = params
                .page_number
                .saturating_sub(1)
                .saturating_mul(params.page_size);
            let items = matching
                .into_iter()
                .skip(usize::try_from(skip).unwrap_or(usize::MAX))
                .take(usize::try_from(params.page_size).unwrap_or(usize::MAX))
                .collect();
            Ok(PagedList::new(
                items,
                total,
                params.page_number,
                params.page_size,
            ))
        }

        async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>> {
            Ok(self
                .store
                .employees
                .read()
                .get(&id)
                .filter(|e| e.company_id == company_id)
                .cloned())
        }

        async fn create(&self, employee: &Employee) -> Result<()> {
            self.store
                .employees
                .write()
                .insert(employee.id, employee.clone());
            Ok(())
        }

        async fn update(&self, employee: &Employee) -> Result<()> {
            self.store
                .employees
                .write()
                .insert(employee.id, employee.clone());
            Ok(())
        }

        async fn delete(&self, _company_id: Uuid, id: Uuid) -> Result<()> {
            self.store.employees.write().remove(&id);
            Ok(())
        }
    }

    #[derive(Clone)]
    pub struct MockUserRepo {
        store: Arc<MemoryStore>,
    }

    impl MockUserRepo {
        pub fn new(store: Arc<MemoryStore>) -> Self {
            Self { store }
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepo {
        async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
            Ok(self.store.user(user_name))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            Ok(self
                .store
                .users
                .read()
                .values()
                .find(|u| u.email.as_deref() == Some(email))
                .cloned())
        }

        async fn create(&self, user: &User, roles: &[String]) -> Result<()> {
            self.store.users.write().insert(user.id, user.clone());
            let mut grants = self.store.user_roles.write();
            for role in roles {
                grants.push((user.id, role.clone()));
            }
            Ok(())
        }

        async fn roles_of(&self, user_id: Uuid) -> Result<Vec<String>> {
            Ok(self
                .store
                .user_roles
                .read()
                .iter()
                .filter(|(id, _)| *id == user_id)
                .map(|(_, role)| role.clone())
                .collect())
        }

        async fn existing_roles(&self, names: &[String]) -> Result<Vec<String>> {
            Ok(names
                .iter()
                .filter(|name| [ROLE_MANAGER, ROLE_ADMINISTRATOR].contains(&name.as_str()))
                .cloned()
                .collect())
        }

        async fn save_refresh_token(
            &self,
            user_id: Uuid,
            token: &str,
            expiry: Option<DateTime<Utc>>,
        ) -> Result<()> {
            if let Some(user) = self.store.users.write().get_mut(&user_id) {
                user.refresh_token = Some(token.to_string());
                if expiry.is_some() {
                    user.refresh_token_expiry = expiry;
                }
            }
            Ok(())
        }
    }
}

/// Services wired over the given store
pub fn services(store: &Arc<MemoryStore>) -> ServiceManager {
    let repos = RepositoryManager::new(
        Arc::new(mocks::MockCompanyRepo::new(store.clone())),
        Arc::new(mocks::MockEmployeeRepo::new(store.clone())),
        Arc::new(mocks::MockUserRepo::new(store.clone())),
    );
    ServiceManager::new(repos, &test_config())
}

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {test_name}");
    println!("📋 PURPOSE: {purpose}");
}
