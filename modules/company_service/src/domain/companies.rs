//! Company operations

use super::repository::RepositoryManager;
use super::validation::validate_company;
use crate::contract::error::internal;
use crate::contract::{Company, CompanyDraft, Employee, ServiceError};
use std::collections::HashSet;
use uuid::Uuid;

/// Company use cases on top of the repository manager
#[derive(Clone)]
pub struct CompanyService {
    repos: RepositoryManager,
}

impl CompanyService {
    pub fn new(repos: RepositoryManager) -> Self {
        Self { repos }
    }

    /// All companies ordered by name
    pub async fn get_all_companies(&self) -> Result<Vec<Company>, ServiceError> {
        self.repos.company().find_all().await.map_err(internal)
    }

    pub async fn get_company(&self, id: Uuid) -> Result<Company, ServiceError> {
        self.repos
            .company()
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| ServiceError::company_not_found(id))
    }

    /// Create a company and any employees submitted with it
    pub async fn create_company(&self, draft: &CompanyDraft) -> Result<Company, ServiceError> {
        let (company, employees) = build_company(draft)?;

        self.repos
            .company()
            .create(&company, &employees)
            .await
            .map_err(internal)?;

        tracing::info!(
            company_id = %company.id,
            employees = employees.len(),
            "company created"
        );
        Ok(company)
    }

    /// Companies for an explicit id list, in request order.
    ///
    /// Duplicated ids are collapsed; every remaining id must exist.
    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::bad_request("Parameter ids is null"));
        }

        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut found = self
            .repos
            .company()
            .find_by_ids(&unique)
            .await
            .map_err(internal)?;

        if found.len() != unique.len() {
            return Err(ServiceError::bad_request(
                "Collection count mismatch comparing to ids.",
            ));
        }

        found.sort_by_key(|company| unique.iter().position(|id| *id == company.id));
        Ok(found)
    }

    /// Create several companies at once; nothing is stored when one is invalid
    pub async fn create_company_collection(
        &self,
        drafts: &[CompanyDraft],
    ) -> Result<Vec<Company>, ServiceError> {
        if drafts.is_empty() {
            return Err(ServiceError::bad_request(
                "Company collection sent from a client is null.",
            ));
        }

        let batch = drafts
            .iter()
            .map(build_company)
            .collect::<Result<Vec<_>, _>>()?;

        self.repos
            .company()
            .create_many(&batch)
            .await
            .map_err(internal)?;

        tracing::info!(count = batch.len(), "company collection created");
        Ok(batch.into_iter().map(|(company, _)| company).collect())
    }

    /// Replace the company's fields; submitted employees are added to it
    pub async fn update_company(&self, id: Uuid, draft: &CompanyDraft) -> Result<(), ServiceError> {
        let mut company = self.get_company(id).await?;
        let input = validate_company(draft)?;

        company.name = input.name;
        company.address = input.address;
        company.country = input.country;
        let new_employees: Vec<Employee> = input
            .employees
            .into_iter()
            .map(|employee| employee.into_employee(id))
            .collect();

        self.repos
            .company()
            .update(&company, &new_employees)
            .await
            .map_err(internal)?;

        tracing::info!(company_id = %id, "company updated");
        Ok(())
    }

    /// Delete a company together with its employees
    pub async fn delete_company(&self, id: Uuid) -> Result<(), ServiceError> {
        self.get_company(id).await?;

        self.repos.company().delete(id).await.map_err(internal)?;

        tracing::info!(company_id = %id, "company deleted");
        Ok(())
    }
}

fn build_company(draft: &CompanyDraft) -> Result<(Company, Vec<Employee>), ServiceError> {
    let input = validate_company(draft)?;
    let company = Company {
        id: Uuid::new_v4(),
        name: input.name,
        address: input.address,
        country: input.country,
    };
    let employees = input
        .employees
        .into_iter()
        .map(|employee| employee.into_employee(company.id))
        .collect();
    Ok((company, employees))
}
