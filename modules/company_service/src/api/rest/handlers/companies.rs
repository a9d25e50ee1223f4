//! Company endpoints

use crate::api::rest::{
    dto::{CompanyDto, CompanyForCreationDto, CompanyForUpdateDto},
    error::{map_domain_error, Problem},
    extract::{ApiPath, AuthUser, JsonBody},
    mapper::company_dto,
    negotiation::{negotiate, render_list, render_one, MediaKind},
    versioning::ApiVersion,
};
use crate::contract::{CompanyDraft, ServiceError, ROLE_MANAGER};
use crate::domain::ServiceManager;
use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use std::sync::Arc;
use uuid::Uuid;

const COMPANY_MEDIA: [MediaKind; 2] = [MediaKind::Json, MediaKind::Csv];

fn with_location(mut response: Response, location: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

/// Parse `(id1,id2)` or `id1,id2` into ids
pub fn parse_ids(raw: &str) -> Result<Vec<Uuid>, ServiceError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|_| ServiceError::bad_request(format!("'{id}' is not a valid company id.")))
        })
        .collect()
}

/// List all companies (Manager role)
#[utoipa::path(
    get,
    path = "/api/companies",
    params(("api-version" = Option<String>, Header, description = "1.0 (default) or 2.0")),
    responses(
        (status = 200, description = "Companies", body = [CompanyDto]),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 403, description = "Manager role required", body = Problem),
        (status = 406, description = "Unsupported media type requested", body = Problem)
    ),
    tag = "companies",
    security(("Bearer" = []))
)]
pub async fn get_companies(
    Extension(services): Extension<Arc<ServiceManager>>,
    user: AuthUser,
    version: ApiVersion,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    user.require_role(ROLE_MANAGER)?;
    let media = negotiate(&headers, &COMPANY_MEDIA)?;

    let companies = services
        .companies()
        .get_all_companies()
        .await
        .map_err(map_domain_error)?;

    let dtos: Vec<CompanyDto> = companies
        .iter()
        .map(|company| company_dto(company, version))
        .collect();

    Ok(render_list(StatusCode::OK, media, &dtos))
}

/// Allowed methods on the company collection
#[utoipa::path(
    options,
    path = "/api/companies",
    responses((status = 200, description = "Allowed methods", headers(("Allow" = String)))),
    tag = "companies"
)]
pub async fn companies_options() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::ALLOW, HeaderValue::from_static("GET, OPTIONS, POST"))],
    )
}

#[utoipa::path(
    get,
    path = "/api/companies/{company_id}",
    params(("company_id" = Uuid, Path, description = "Company identifier")),
    responses(
        (status = 200, description = "Company", body = CompanyDto),
        (status = 304, description = "Entity tag still matches"),
        (status = 404, description = "Company not found", body = Problem),
        (status = 406, description = "Unsupported media type requested", body = Problem)
    ),
    tag = "companies"
)]
pub async fn get_company(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath(company_id): ApiPath<Uuid>,
    version: ApiVersion,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let media = negotiate(&headers, &COMPANY_MEDIA)?;
    let company = services
        .companies()
        .get_company(company_id)
        .await
        .map_err(map_domain_error)?;

    Ok(render_one(StatusCode::OK, media, &company_dto(&company, version)))
}

#[utoipa::path(
    get,
    path = "/api/companies/collection/{ids}",
    params(("ids" = String, Path, description = "Comma separated ids, e.g. (id1,id2)")),
    responses(
        (status = 200, description = "Companies in request order", body = [CompanyDto]),
        (status = 400, description = "Missing, malformed or unknown ids", body = Problem)
    ),
    tag = "companies"
)]
pub async fn get_company_collection(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath(raw_ids): ApiPath<String>,
    version: ApiVersion,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let media = negotiate(&headers, &COMPANY_MEDIA)?;
    let ids = parse_ids(&raw_ids).map_err(map_domain_error)?;

    let companies = services
        .companies()
        .get_by_ids(&ids)
        .await
        .map_err(map_domain_error)?;

    let dtos: Vec<CompanyDto> = companies
        .iter()
        .map(|company| company_dto(company, version))
        .collect();

    Ok(render_list(StatusCode::OK, media, &dtos))
}

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CompanyForCreationDto,
    responses(
        (status = 201, description = "Company created", body = CompanyDto, headers(("Location" = String))),
        (status = 400, description = "Body missing or malformed", body = Problem),
        (status = 422, description = "Validation failed", body = Problem)
    ),
    tag = "companies"
)]
pub async fn create_company(
    Extension(services): Extension<Arc<ServiceManager>>,
    version: ApiVersion,
    headers: HeaderMap,
    JsonBody(dto): JsonBody<CompanyForCreationDto>,
) -> Result<Response, Problem> {
    let media = negotiate(&headers, &COMPANY_MEDIA)?;
    let draft: CompanyDraft = dto.into();

    let company = services
        .companies()
        .create_company(&draft)
        .await
        .map_err(map_domain_error)?;

    let response = render_one(StatusCode::CREATED, media, &company_dto(&company, version));
    Ok(with_location(
        response,
        &format!("/api/companies/{}", company.id),
    ))
}

#[utoipa::path(
    post,
    path = "/api/companies/collection",
    request_body = [CompanyForCreationDto],
    responses(
        (status = 201, description = "Companies created", body = [CompanyDto], headers(("Location" = String))),
        (status = 400, description = "Collection missing or empty", body = Problem),
        (status = 422, description = "Validation failed", body = Problem)
    ),
    tag = "companies"
)]
pub async fn create_company_collection(
    Extension(services): Extension<Arc<ServiceManager>>,
    version: ApiVersion,
    headers: HeaderMap,
    JsonBody(dtos): JsonBody<Vec<CompanyForCreationDto>>,
) -> Result<Response, Problem> {
    let media = negotiate(&headers, &COMPANY_MEDIA)?;
    let drafts: Vec<CompanyDraft> = dtos.into_iter().map(Into::into).collect();

    let companies = services
        .companies()
        .create_company_collection(&drafts)
        .await
        .map_err(map_domain_error)?;

    let ids = companies
        .iter()
        .map(|company| company.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let dtos: Vec<CompanyDto> = companies
        .iter()
        .map(|company| company_dto(company, version))
        .collect();

    let response = render_list(StatusCode::CREATED, media, &dtos);
    Ok(with_location(
        response,
        &format!("/api/companies/collection/({ids})"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/companies/{company_id}",
    params(("company_id" = Uuid, Path, description = "Company identifier")),
    request_body = CompanyForUpdateDto,
    responses(
        (status = 204, description = "Company updated"),
        (status = 400, description = "Body missing or malformed", body = Problem),
        (status = 404, description = "Company not found", body = Problem),
        (status = 422, description = "Validation failed", body = Problem)
    ),
    tag = "companies"
)]
pub async fn update_company(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath(company_id): ApiPath<Uuid>,
    JsonBody(dto): JsonBody<CompanyForUpdateDto>,
) -> Result<StatusCode, Problem> {
    let draft: CompanyDraft = dto.into();
    services
        .companies()
        .update_company(company_id, &draft)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/companies/{company_id}",
    params(("company_id" = Uuid, Path, description = "Company identifier")),
    responses(
        (status = 204, description = "Company and its employees deleted"),
        (status = 404, description = "Company not found", body = Problem)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    Extension(services): Extension<Arc<ServiceManager>>,
    ApiPath(company_id): ApiPath<Uuid>,
) -> Result<StatusCode, Problem> {
    services
        .companies()
        .delete_company(company_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}
