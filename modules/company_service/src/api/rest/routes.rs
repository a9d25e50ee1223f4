//! Route registration and the middleware stack

use super::{
    caching::cache_headers,
    error::Problem,
    handlers::{authentication, companies, employees, root},
    openapi::ApiDoc,
    rate_limit::{rate_limit, RateLimiter},
    versioning::{api_version, SUPPORTED_VERSIONS_HEADER},
};
use crate::config::{Config, CorsConfig};
use crate::domain::ServiceManager;
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::{Layer, ServiceExt};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as CorsAny, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Company routes; successful reads carry cache validators
fn company_routes(config: &Config) -> Router {
    Router::new()
        .route(
            "/api/companies",
            get(companies::get_companies)
                .post(companies::create_company)
                .options(companies::companies_options),
        )
        .route("/api/companies/collection", post(companies::create_company_collection))
        .route(
            "/api/companies/collection/{ids}",
            get(companies::get_company_collection),
        )
        .route(
            "/api/companies/{company_id}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route_layer(middleware::from_fn_with_state(
            config.caching.clone(),
            cache_headers,
        ))
}

fn employee_routes() -> Router {
    Router::new()
        .route(
            "/api/companies/{company_id}/employees",
            get(employees::get_employees).post(employees::create_employee),
        )
        .route(
            "/api/companies/{company_id}/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .patch(employees::partially_update_employee)
                .delete(employees::delete_employee),
        )
}

fn authentication_routes() -> Router {
    Router::new()
        .route("/api/authentication", post(authentication::register_user))
        .route("/api/authentication/login", post(authentication::authenticate))
        .route("/api/token/refresh", post(authentication::refresh))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.is_empty() {
        AllowOrigin::from(CorsAny)
    } else {
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny)
        .expose_headers([
            HeaderName::from_static("x-pagination"),
            SUPPORTED_VERSIONS_HEADER,
            header::ETAG,
            header::LOCATION,
        ])
}

/// Apply CORS to everything except a plain `OPTIONS` request.
///
/// Only an `OPTIONS` carrying `Access-Control-Request-Method` is a preflight;
/// any other `OPTIONS` reaches its route and answers with `Allow`.
async fn apply_cors(State(cors): State<CorsLayer>, request: Request, next: Next) -> Response {
    let plain_options = request.method() == Method::OPTIONS
        && !request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);
    if plain_options {
        return next.run(request).await;
    }

    match cors.layer(next).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %message, "request handler panicked");
    Problem::internal().into_response()
}

/// Build the full HTTP application over the given services
pub fn build_router(services: Arc<ServiceManager>, config: &Config) -> Router {
    let mut api = Router::new()
        .route("/api", get(root::get_root))
        .merge(company_routes(config))
        .merge(employee_routes())
        .merge(authentication_routes())
        .layer(middleware::from_fn(api_version));

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        api = api.layer(middleware::from_fn_with_state(limiter, rate_limit));
    } else {
        tracing::info!("rate limiting disabled");
    }

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(root::not_found)
        .layer(Extension(services))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(middleware::from_fn_with_state(
            cors_layer(&config.cors),
            apply_cors,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::custom(panic_response))
}
