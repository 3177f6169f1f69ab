//! HTTP surface: route table, CORS policy and request-body error mapping.

pub mod employees;
pub mod profile;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::JsonPayloadError;
use actix_web::http::{Method, StatusCode};
use actix_web::middleware::Next;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::handlers::login;
use crate::config::CorsConfig;
use crate::error::AppError;
use crate::{health_check, index};

/// Registers every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/api/login")
                .route(web::post().to(login))
                .route(web::method(Method::OPTIONS).to(preflight)),
        )
        .service(
            web::resource("/api/employees")
                .route(web::get().to(employees::list_employees))
                .route(web::post().to(employees::create_employee))
                .route(web::method(Method::OPTIONS).to(preflight)),
        )
        .service(
            web::resource("/api/employees/{id}")
                .route(web::get().to(employees::get_employee))
                .route(web::delete().to(employees::delete_employee))
                .route(web::method(Method::OPTIONS).to(preflight)),
        )
        .service(
            web::resource("/api/profile/{id}")
                .route(web::get().to(profile::get_profile))
                .route(web::put().to(profile::update_profile))
                .route(web::method(Method::OPTIONS).to(preflight)),
        );
}

/// Browser access from the configured development origins. Other origins
/// are served without CORS headers rather than rejected.
pub fn cors(config: &CorsConfig) -> Cors {
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Authorization"])
        .supports_credentials()
        .block_on_origin_mismatch(false)
        .max_age(config.max_age)
}

/// Answers successful preflights with 204 and no body.
pub async fn preflight_no_content(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let is_options = req.method() == Method::OPTIONS;
    let mut res = next.call(req).await?;
    if is_options && res.status() == StatusCode::OK {
        res.response_mut().head_mut().status = StatusCode::NO_CONTENT;
    }
    Ok(res)
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(e) if e.is_data() => format!("Invalid data: {}", e),
        _ => "Invalid JSON data".to_string(),
    };
    AppError::ValidationError(message).into()
}

/// Path ids are parsed by hand so a malformed id is a 400, not a 404.
pub fn parse_employee_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::ValidationError("Invalid employee ID".into()))
}
