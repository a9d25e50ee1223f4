//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the DTO schemas and the bearer
//! JWT security scheme. Swagger UI serves it under `/swagger-ui`.

use super::dto::{
    CompanyDto, CompanyForCreationDto, CompanyForUpdateDto, EmployeeDto, EmployeeForCreationDto,
    EmployeeForUpdateDto, Link, TokenDto, UserForAuthenticationDto, UserForRegistrationDto,
};
use super::error::Problem;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Access token issued by POST /api/authentication/login."))
            .build();
        components.add_security_scheme("Bearer", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Company Employees API",
        description = "Companies, their employees and the identity endpoints guarding them.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::rest::handlers::root::get_root,
        crate::api::rest::handlers::companies::get_companies,
        crate::api::rest::handlers::companies::companies_options,
        crate::api::rest::handlers::companies::get_company,
        crate::api::rest::handlers::companies::get_company_collection,
        crate::api::rest::handlers::companies::create_company,
        crate::api::rest::handlers::companies::create_company_collection,
        crate::api::rest::handlers::companies::update_company,
        crate::api::rest::handlers::companies::delete_company,
        crate::api::rest::handlers::employees::get_employees,
        crate::api::rest::handlers::employees::get_employee,
        crate::api::rest::handlers::employees::create_employee,
        crate::api::rest::handlers::employees::update_employee,
        crate::api::rest::handlers::employees::partially_update_employee,
        crate::api::rest::handlers::employees::delete_employee,
        crate::api::rest::handlers::authentication::register_user,
        crate::api::rest::handlers::authentication::authenticate,
        crate::api::rest::handlers::authentication::refresh,
    ),
    components(schemas(
        CompanyDto,
        CompanyForCreationDto,
        CompanyForUpdateDto,
        EmployeeDto,
        EmployeeForCreationDto,
        EmployeeForUpdateDto,
        Link,
        TokenDto,
        UserForAuthenticationDto,
        UserForRegistrationDto,
        Problem
    )),
    tags(
        (name = "root", description = "API entry point"),
        (name = "companies", description = "Company resources"),
        (name = "employees", description = "Employees of a company"),
        (name = "authentication", description = "Registration and tokens")
    )
)]
pub struct ApiDoc;
