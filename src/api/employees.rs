use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::parse_employee_id;
use crate::db::models::{NewEmployee, DATE_FORMAT};
use crate::error::AppError;
use crate::AppState;

/// Salary as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SalaryInput {
    Amount(f64),
    Text(String),
}

impl SalaryInput {
    fn amount(&self) -> Result<f64, AppError> {
        match self {
            SalaryInput::Amount(v) => Ok(*v),
            SalaryInput::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                AppError::ValidationError(format!("Invalid data: salary '{}' is not a number", s))
            }),
        }
    }
}

/// Create payload. Fields are optional here so a missing one can be named
/// in the error.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<SalaryInput>,
    pub hire_date: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::ValidationError(format!("Missing required field: {}", field)))
}

impl CreateEmployeeRequest {
    /// Splits the payload into the employee record and optional credentials
    /// for a linked account.
    pub fn into_parts(self) -> Result<(NewEmployee, Option<(String, String)>), AppError> {
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        let position = required(self.position, "position")?;
        let department = required(self.department, "department")?;
        let salary = required(self.salary, "salary")?;
        let hire_date = required(self.hire_date, "hire_date")?;

        if name.trim().is_empty() {
            return Err(AppError::ValidationError("Name cannot be empty".into()));
        }
        if email.trim().is_empty() {
            return Err(AppError::ValidationError("Email cannot be empty".into()));
        }

        let hire_date = NaiveDate::parse_from_str(hire_date.trim(), DATE_FORMAT).map_err(|_| {
            AppError::ValidationError(format!(
                "Invalid data: hire_date '{}' is not a YYYY-MM-DD date",
                hire_date
            ))
        })?;

        let employee = NewEmployee {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            position,
            department,
            salary: salary.amount()?,
            hire_date,
        };
        employee.validate()?;

        let credentials = match (self.username, self.password) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.trim().is_empty() =>
            {
                Some((username.trim().to_string(), password))
            }
            _ => None,
        };

        Ok((employee, credentials))
    }
}

pub async fn list_employees(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let employees = state.employees.get_all().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    req: web::Json<CreateEmployeeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (employee, credentials) = req.into_inner().into_parts().map_err(|e| {
        warn!("Rejected employee payload: {}", e);
        e
    })?;

    let id = state.employees.create(&employee).await?;
    info!("Employee {} created (email: {})", id, employee.email);

    // Account creation is best-effort: the employee already exists.
    if let Some((username, password)) = credentials {
        match state.users.create_employee_user(&username, &password, id).await {
            Ok(_) => info!("User account '{}' created for employee {}", username, id),
            Err(e) => warn!("Failed to create user account for employee {}: {}", id, e),
        }
    }

    Ok(HttpResponse::Created().json(json!({
        "message": "Employee created successfully",
        "id": id,
    })))
}

pub async fn get_employee(
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

pub async fn delete_employee(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_employee_id(&path)?;
    if !state.employees.delete(id).await? {
        return Err(AppError::employee_not_found());
    }

    info!("Employee {} deleted", id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateEmployeeRequest {
        serde_json::from_value(value).unwrap()
    }

    fn payload() -> serde_json::Value {
        json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "position": "Admiral",
            "department": "Navy",
            "salary": 9100.25,
            "hire_date": "2023-11-20"
        })
    }

    #[test]
    fn test_complete_payload() {
        let (employee, credentials) = request(payload()).into_parts().unwrap();
        assert_eq!(employee.name, "Grace Hopper");
        assert_eq!(employee.salary, 9100.25);
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2023, 11, 20).unwrap());
        assert!(credentials.is_none());
    }

    #[test]
    fn test_missing_field_is_named() {
        for field in ["name", "email", "position", "department", "salary", "hire_date"] {
            let mut value = payload();
            value.as_object_mut().unwrap().remove(field);
            let err = request(value).into_parts().unwrap_err();
            assert_eq!(err.to_string(), format!("Missing required field: {}", field));
        }
    }

    #[test]
    fn test_blank_name_and_email() {
        let mut value = payload();
        value["name"] = json!("  ");
        assert_eq!(
            request(value).into_parts().unwrap_err().to_string(),
            "Name cannot be empty"
        );

        let mut value = payload();
        value["email"] = json!("");
        assert_eq!(
            request(value).into_parts().unwrap_err().to_string(),
            "Email cannot be empty"
        );
    }

    #[test]
    fn test_salary_as_string() {
        let mut value = payload();
        value["salary"] = json!("4500.50");
        let (employee, _) = request(value).into_parts().unwrap();
        assert_eq!(employee.salary, 4500.5);

        let mut value = payload();
        value["salary"] = json!("lots");
        assert!(matches!(
            request(value).into_parts(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_oversized_values_rejected() {
        let mut value = payload();
        value["name"] = json!("a".repeat(101));
        assert!(matches!(
            request(value).into_parts(),
            Err(AppError::ValidationError(_))
        ));

        let mut value = payload();
        value["salary"] = json!(1.0e9);
        assert!(matches!(
            request(value).into_parts(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bad_hire_date() {
        let mut value = payload();
        value["hire_date"] = json!("20/11/2023");
        assert!(matches!(
            request(value).into_parts(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let mut value = payload();
        value["username"] = json!("grace");
        let (_, credentials) = request(value.clone()).into_parts().unwrap();
        assert!(credentials.is_none());

        value["password"] = json!("   ");
        let (_, credentials) = request(value.clone()).into_parts().unwrap();
        assert!(credentials.is_none());

        value["password"] = json!("cobol");
        let (_, credentials) = request(value).into_parts().unwrap();
        assert_eq!(credentials, Some(("grace".to_string(), "cobol".to_string())));
    }
}
