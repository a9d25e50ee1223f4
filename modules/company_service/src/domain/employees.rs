//! Employee operations, always scoped to an existing company

use super::paging::{EmployeeParameters, PagedList};
use super::repository::RepositoryManager;
use super::validation::validate_employee;
use crate::contract::error::internal;
use crate::contract::{Employee, EmployeeDraft, ServiceError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employee use cases on top of the repository manager
#[derive(Clone)]
pub struct EmployeeService {
    repos: RepositoryManager,
    max_page_size: u64,
}

/// Document a JSON Patch is applied to; mirrors the update payload
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EmployeePatchDocument {
    name: Option<String>,
    age: Option<i32>,
    position: Option<String>,
}

impl From<&Employee> for EmployeePatchDocument {
    fn from(employee: &Employee) -> Self {
        Self {
            name: Some(employee.name.clone()),
            age: Some(employee.age),
            position: Some(employee.position.clone()),
        }
    }
}

impl From<EmployeePatchDocument> for EmployeeDraft {
    fn from(doc: EmployeePatchDocument) -> Self {
        Self {
            name: doc.name,
            age: doc.age,
            position: doc.position,
        }
    }
}

impl EmployeeService {
    pub fn new(repos: RepositoryManager, max_page_size: u64) -> Self {
        Self {
            repos,
            max_page_size,
        }
    }

    /// One page of a company's employees
    pub async fn get_employees(
        &self,
        company_id: Uuid,
        params: EmployeeParameters,
    ) -> Result<PagedList<Employee>, ServiceError> {
        if !params.valid_age_range() {
            return Err(ServiceError::bad_request(
                "Max age can't be less than min age.",
            ));
        }
        self.ensure_company_exists(company_id).await?;

        let params = params.normalized(self.max_page_size);
        self.repos
            .employee()
            .find_page(company_id, &params)
            .await
            .map_err(internal)
    }

    pub async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Employee, ServiceError> {
        self.ensure_company_exists(company_id).await?;
        self.load_employee(company_id, id).await
    }

    pub async fn create_employee(
        &self,
        company_id: Uuid,
        draft: &EmployeeDraft,
    ) -> Result<Employee, ServiceError> {
        self.ensure_company_exists(company_id).await?;
        let employee = validate_employee(draft)?.into_employee(company_id);

        self.repos
            .employee()
            .create(&employee)
            .await
            .map_err(internal)?;

        tracing::info!(company_id = %company_id, employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    pub async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.ensure_company_exists(company_id).await?;
        self.load_employee(company_id, id).await?;

        self.repos
            .employee()
            .delete(company_id, id)
            .await
            .map_err(internal)?;

        tracing::info!(company_id = %company_id, employee_id = %id, "employee deleted");
        Ok(())
    }

    /// Replace all updatable fields of an employee
    pub async fn update_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        draft: &EmployeeDraft,
    ) -> Result<(), ServiceError> {
        self.ensure_company_exists(company_id).await?;
        let employee = self.load_employee(company_id, id).await?;
        self.apply_and_save(employee, draft).await
    }

    /// Apply an RFC 6902 patch to the employee's update representation.
    ///
    /// The patched document is validated exactly like a full update.
    pub async fn partially_update_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        patch: &json_patch::Patch,
    ) -> Result<(), ServiceError> {
        self.ensure_company_exists(company_id).await?;
        let employee = self.load_employee(company_id, id).await?;

        let mut document = serde_json::to_value(EmployeePatchDocument::from(&employee))
            .map_err(|err| internal(err.into()))?;

        json_patch::patch(&mut document, patch)
            .map_err(|err| ServiceError::invalid_field("patch", err.to_string()))?;

        let patched: EmployeePatchDocument = serde_json::from_value(document)
            .map_err(|err| ServiceError::invalid_field("patch", err.to_string()))?;

        self.apply_and_save(employee, &patched.into()).await
    }

    async fn apply_and_save(
        &self,
        mut employee: Employee,
        draft: &EmployeeDraft,
    ) -> Result<(), ServiceError> {
        let input = validate_employee(draft)?;
        employee.name = input.name;
        employee.age = input.age;
        employee.position = input.position;

        self.repos
            .employee()
            .update(&employee)
            .await
            .map_err(internal)?;

        tracing::info!(
            company_id = %employee.company_id,
            employee_id = %employee.id,
            "employee updated"
        );
        Ok(())
    }

    async fn ensure_company_exists(&self, company_id: Uuid) -> Result<(), ServiceError> {
        match self
            .repos
            .company()
            .find_by_id(company_id)
            .await
            .map_err(internal)?
        {
            Some(_) => Ok(()),
            None => Err(ServiceError::company_not_found(company_id)),
        }
    }

    async fn load_employee(&self, company_id: Uuid, id: Uuid) -> Result<Employee, ServiceError> {
        self.repos
            .employee()
            .find_by_id(company_id, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| ServiceError::employee_not_found(id))
    }
}
