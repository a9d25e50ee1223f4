//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use super::versioning::ApiVersion;
use crate::contract;
use crate::domain::PageMetadata;

// ===== Company conversions =====

impl From<&contract::Company> for CompanyDto {
    fn from(company: &contract::Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            full_address: company.full_address(),
        }
    }
}

/// Company representation for the negotiated API version
pub fn company_dto(company: &contract::Company, version: ApiVersion) -> CompanyDto {
    let mut dto = CompanyDto::from(company);
    if version == ApiVersion::V2 {
        dto.name.push_str(" V2");
    }
    dto
}

impl From<CompanyForCreationDto> for contract::CompanyDraft {
    fn from(dto: CompanyForCreationDto) -> Self {
        Self {
            name: dto.name,
            address: dto.address,
            country: dto.country,
            employees: dto
                .employees
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<CompanyForUpdateDto> for contract::CompanyDraft {
    fn from(dto: CompanyForUpdateDto) -> Self {
        Self {
            name: dto.name,
            address: dto.address,
            country: dto.country,
            employees: dto
                .employees
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

// ===== Employee conversions =====

impl From<&contract::Employee> for EmployeeDto {
    fn from(employee: &contract::Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            age: employee.age,
            position: employee.position.clone(),
        }
    }
}

impl From<EmployeeForCreationDto> for contract::EmployeeDraft {
    fn from(dto: EmployeeForCreationDto) -> Self {
        Self {
            name: dto.name,
            age: dto.age,
            position: dto.position,
        }
    }
}

impl From<EmployeeForUpdateDto> for contract::EmployeeDraft {
    fn from(dto: EmployeeForUpdateDto) -> Self {
        Self {
            name: dto.name,
            age: dto.age,
            position: dto.position,
        }
    }
}

impl From<EmployeeListQuery> for crate::domain::EmployeeParameters {
    fn from(query: EmployeeListQuery) -> Self {
        let defaults = Self::default();
        Self {
            page_number: query.page_number.unwrap_or(defaults.page_number),
            page_size: query.page_size.unwrap_or(defaults.page_size),
            min_age: query.min_age.unwrap_or(defaults.min_age),
            max_age: query.max_age.unwrap_or(defaults.max_age),
            search_term: query.search_term,
            order_by: query.order_by.or(defaults.order_by),
            fields: query.fields,
        }
    }
}

impl From<&PageMetadata> for PaginationHeader {
    fn from(meta: &PageMetadata) -> Self {
        Self {
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            page_size: meta.page_size,
            total_count: meta.total_count,
            has_previous: meta.has_previous(),
            has_next: meta.has_next(),
        }
    }
}

// ===== Authentication conversions =====

impl From<UserForRegistrationDto> for contract::Registration {
    fn from(dto: UserForRegistrationDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            user_name: dto.user_name,
            password: dto.password,
            email: dto.email,
            phone_number: dto.phone_number,
            roles: dto.roles.unwrap_or_default(),
        }
    }
}

impl From<contract::TokenPair> for TokenDto {
    fn from(pair: contract::TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

impl From<TokenDto> for contract::TokenPair {
    fn from(dto: TokenDto) -> Self {
        Self {
            access_token: dto.access_token,
            refresh_token: dto.refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn v2_suffixes_company_names() {
        let company = contract::Company {
            id: Uuid::new_v4(),
            name: "IT_Solutions Ltd".to_string(),
            address: "583 Wall Dr. Gwynn Oak, MD 21207".to_string(),
            country: "USA".to_string(),
        };

        assert_eq!(company_dto(&company, ApiVersion::V1).name, "IT_Solutions Ltd");
        let v2 = company_dto(&company, ApiVersion::V2);
        assert_eq!(v2.name, "IT_Solutions Ltd V2");
        assert_eq!(v2.full_address, "583 Wall Dr. Gwynn Oak, MD 21207 USA");
    }

    #[test]
    fn missing_query_values_fall_back_to_defaults() {
        let params: crate::domain::EmployeeParameters = EmployeeListQuery {
            page_size: Some(3),
            ..Default::default()
        }
        .into();

        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, 3);
        assert_eq!(params.order_by.as_deref(), Some("name"));
    }
}
