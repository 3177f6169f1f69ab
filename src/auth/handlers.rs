use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = req.into_inner();
    let (Some(username), Some(password)) = (non_blank(username), non_blank(password)) else {
        return Err(AppError::ValidationError(
            "Username and password are required".into(),
        ));
    };

    match state.users.authenticate(&username, &password).await? {
        Some(user) => {
            info!("Login successful for user: {}", username);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "user": user,
                "message": "Login successful",
            })))
        }
        None => {
            warn!("Login failed for user: {}", username);
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
