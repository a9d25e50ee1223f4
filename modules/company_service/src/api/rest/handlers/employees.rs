//! Employee endpoints, nested under a company

use crate::api::rest::{
    dto::{
        EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto, EmployeeListQuery,
        PaginationHeader,
    },
    error::{map_domain_error, Problem},
    extract::{ApiPath, ApiQuery, JsonBody},
    negotiation::{negotiate, MediaKind, HATEOAS_MEDIA_TYPE},
    shaping::{linked_employees, shape_employees},
};
use crate::contract::EmployeeDraft;
use crate::domain::{EmployeeParameters, ServiceManager};
use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("x-pagination");

/// Page of a company's employees with paging metadata in `X-Pagination`
#[utoipa::path(
    get,
    path = "/api/companies/{company_id}/employees",
    params(
        ("company_id" = Uuid, Path, description = "Company identifier"),
        EmployeeListQuery
    ),
    responses(
        (status = 200, description = "Employees; HATEOAS media type wraps them with links",
            body = [EmployeeDto], headers(("X-Pagination" = String))),
        (status = 400, description = "Invalid age range or query", body = Problem),
        (status = 404, description = "Company not found", body = Problem),
        (status = 406, description = "Unsupported media type requested", body = Problem)
    ),
    tag = "employees"
)]
pub async fn get_employees(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath(company_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<EmployeeListQuery>,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let media = negotiate(&headers, &[MediaKind::Json, MediaKind::Hateoas])?;
    let params: EmployeeParameters = query.into();
    let fields = params.fields.clone();

    let page = services
        .employees()
        .get_employees(company_id, params)
        .await
        .map_err(map_domain_error)?;

    let pagination = serde_json::to_string(&PaginationHeader::from(&page.meta))
        .map_err(|err| {
            tracing::error!(error = %err, "failed to serialize pagination header");
            Problem::internal()
        })?;
    let dtos: Vec<EmployeeDto> = page.items.iter().map(EmployeeDto::from).collect();
    let shaped = shape_employees(&dtos, fields.as_deref());

    let mut response = match media {
        MediaKind::Hateoas => {
            let body = linked_employees(company_id, shaped, fields.as_deref());
            (
                [(header::CONTENT_TYPE, HeaderValue::from_static(HATEOAS_MEDIA_TYPE))],
                Json(body),
            )
                .into_response()
        }
        _ => {
            let items: Vec<_> = shaped.into_iter().map(|item| item.entity).collect();
            Json(items).into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&pagination) {
        response.headers_mut().insert(PAGINATION_HEADER, value);
    }
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/companies/{company_id}/employees/{id}",
    params(
        ("company_id" = Uuid, Path, description = "Company identifier"),
        ("id" = Uuid, Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Employee", body = EmployeeDto),
        (status = 404, description = "Company or employee not found", body = Problem)
    ),
    tag = "employees"
)]
pub async fn get_employee(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath((company_id, id)): ApiPath<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<EmployeeDto>, Problem> {
    negotiate(&headers, &[MediaKind::Json])?;
    let employee = services
        .employees()
        .get_employee(company_id, id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(EmployeeDto::from(&employee)))
}

#[utoipa::path(
    post,
    path = "/api/companies/{company_id}/employees",
    params(("company_id" = Uuid, Path, description = "Company identifier")),
    request_body = EmployeeForCreationDto,
    responses(
        (status = 201, description = "Employee created", body = EmployeeDto, headers(("Location" = String))),
        (status = 400, description = "Body missing or malformed", body = Problem),
        (status = 404, description = "Company not found", body = Problem),
        (status = 422, description = "Validation failed", body = Problem)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath(company_id): ApiPath<Uuid>,
    JsonBody(dto): JsonBody<EmployeeForCreationDto>,
) -> Result<Response, Problem> {
    let draft: EmployeeDraft = dto.into();
    let employee = services
        .employees()
        .create_employee(company_id, &draft)
        .await
        .map_err(map_domain_error)?;

    let location = format!("/api/companies/{company_id}/employees/{}", employee.id);
    let mut response = (StatusCode::CREATED, Json(EmployeeDto::from(&employee))).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    Ok(response)
}

#[utoipa::path(
    put,
    path = "/api/companies/{company_id}/employees/{id}",
    params(
        ("company_id" = Uuid, Path, description = "Company identifier"),
        ("id" = Uuid, Path, description = "Employee identifier")
    ),
    request_body = EmployeeForUpdateDto,
    responses(
        (status = 204, description = "Employee updated"),
        (status = 400, description = "Body missing or malformed", body = Problem),
        (status = 404, description = "Company or employee not found", body = Problem),
        (status = 422, description = "Validation failed", body = Problem)
    ),
    tag = "employees"
)]
pub async fn update_employee(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath((company_id, id)): ApiPath<(Uuid, Uuid)>,
    JsonBody(dto): JsonBody<EmployeeForUpdateDto>,
) -> Result<StatusCode, Problem> {
    let draft: EmployeeDraft = dto.into();
    services
        .employees()
        .update_employee(company_id, id, &draft)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Apply a JSON Patch (RFC 6902) document to an employee
#[utoipa::path(
    patch,
    path = "/api/companies/{company_id}/employees/{id}",
    params(
        ("company_id" = Uuid, Path, description = "Company identifier"),
        ("id" = Uuid, Path, description = "Employee identifier")
    ),
    request_body(content = Object, content_type = "application/json-patch+json",
        description = "Operations over name, age and position"),
    responses(
        (status = 204, description = "Employee patched"),
        (status = 400, description = "Patch document missing or malformed", body = Problem),
        (status = 404, description = "Company or employee not found", body = Problem),
        (status = 422, description = "Patched employee is invalid", body = Problem)
    ),
    tag = "employees"
)]
pub async fn partially_update_employee(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath((company_id, id)): ApiPath<(Uuid, Uuid)>,
    JsonBody(patch): JsonBody<json_patch::Patch>,
) -> Result<StatusCode, Problem> {
    services
        .employees()
        .partially_update_employee(company_id, id, &patch)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/companies/{company_id}/employees/{id}",
    params(
        ("company_id" = Uuid, Path, description = "Company identifier"),
        ("id" = Uuid, Path, description = "Employee identifier")
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Company or employee not found", body = Problem)
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath((company_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, Problem> {
    services
        .employees()
        .delete_employee(company_id, id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}
