//! Registration, login and token refresh

use crate::api::rest::{
    dto::{TokenDto, UserForAuthenticationDto, UserForRegistrationDto},
    error::{map_domain_error, Problem},
    extract::JsonBody,
};
use crate::contract::{Registration, TokenPair};
use crate::domain::validation::validate_credentials;
use crate::domain::ServiceManager;
use axum::{http::StatusCode, Extension, Json};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/authentication",
    request_body = UserForRegistrationDto,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Rejected by password, uniqueness or role rules", body = Problem),
        (status = 422, description = "Required fields missing", body = Problem)
    ),
    tag = "authentication"
)]
pub async fn register_user(
    Extension(services): Extension<Arc<ServiceManager>>,
    JsonBody(dto): JsonBody<UserForRegistrationDto>,
) -> Result<StatusCode, Problem> {
    let registration: Registration = dto.into();
    services
        .authentication()
        .register_user(registration)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/api/authentication/login",
    request_body = UserForAuthenticationDto,
    responses(
        (status = 200, description = "Token pair issued", body = TokenDto),
        (status = 401, description = "Wrong user name or password", body = Problem),
        (status = 422, description = "Required fields missing", body = Problem)
    ),
    tag = "authentication"
)]
pub async fn authenticate(
    Extension(services): Extension<Arc<ServiceManager>>,
    JsonBody(dto): JsonBody<UserForAuthenticationDto>,
) -> Result<Json<TokenDto>, Problem> {
    let (user_name, password) =
        validate_credentials(dto.user_name.as_deref(), dto.password.as_deref())
            .map_err(map_domain_error)?;

    let tokens = services
        .authentication()
        .login(&user_name, &password)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(tokens.into()))
}

#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = TokenDto,
    responses(
        (status = 200, description = "Token pair rotated", body = TokenDto),
        (status = 400, description = "Token pair is invalid or expired", body = Problem)
    ),
    tag = "authentication"
)]
pub async fn refresh(
    Extension(services): Extension<Arc<ServiceManager>>,
    JsonBody(dto): JsonBody<TokenDto>,
) -> Result<Json<TokenDto>, Problem> {
    let pair: TokenPair = dto.into();
    let tokens = services
        .authentication()
        .refresh_token(&pair)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(tokens.into()))
}
