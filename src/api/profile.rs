use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::parse_employee_id;
use crate::db::models::{validate_length, EmployeeField};
use crate::error::AppError;
use crate::AppState;

/// Self-service profile edits. Any key other than `name` or `email` fails
/// deserialization and is answered with 400.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn into_fields(self) -> Result<Vec<EmployeeField>, AppError> {
        let mut fields = Vec::with_capacity(2);
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(AppError::ValidationError("Name cannot be empty".into()));
            }
            validate_length("name", name.trim())?;
            fields.push(EmployeeField::Name(name.trim().to_string()));
        }
        if let Some(email) = self.email {
            if email.trim().is_empty() {
                return Err(AppError::ValidationError("Email cannot be empty".into()));
            }
            validate_length("email", email.trim())?;
            fields.push(EmployeeField::Email(email.trim().to_string()));
        }

        if fields.is_empty() {
            return Err(AppError::ValidationError("No valid fields to update".into()));
        }
        Ok(fields)
    }
}

pub async fn get_profile(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_employee_id(&path)?;
    let employee = state
        .employees
        .get_by_id(id)
        .await?
        .ok_or_else(AppError::employee_not_found)?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_profile(
    path: web::Path<String>,
    req: web::Json<ProfileUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_employee_id(&path)?;
    let fields = req.into_inner().into_fields()?;

    if !state.employees.update_profile(id, &fields).await? {
        return Err(AppError::employee_not_found());
    }

    info!("Profile {} updated", id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Profile updated successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_only() {
        let update: ProfileUpdate = serde_json::from_value(json!({ "name": "X" })).unwrap();
        assert_eq!(update.into_fields().unwrap(), vec![EmployeeField::Name("X".into())]);
    }

    #[test]
    fn test_empty_update_rejected() {
        let update: ProfileUpdate = serde_json::from_value(json!({})).unwrap();
        let err = update.into_fields().unwrap_err();
        assert_eq!(err.to_string(), "No valid fields to update");
    }

    #[test]
    fn test_oversized_email_rejected() {
        let email = format!("{}@example.com", "x".repeat(100));
        let update: ProfileUpdate = serde_json::from_value(json!({ "email": email })).unwrap();
        assert!(matches!(update.into_fields(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_other_fields_rejected() {
        let result = serde_json::from_value::<ProfileUpdate>(json!({ "salary": 1 }));
        assert!(result.is_err());

        let result =
            serde_json::from_value::<ProfileUpdate>(json!({ "name": "X", "position": "CEO" }));
        assert!(result.is_err());
    }
}
