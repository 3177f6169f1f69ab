use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    /// Read back as `float8`; the column itself is `NUMERIC(10,2)`.
    pub salary: f64,
    #[serde(serialize_with = "serialize_date")]
    pub hire_date: NaiveDate,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

/// Every client-supplied employee column, used for inserts and full updates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
}

/// Width of the `VARCHAR(100)` text columns on `employees`.
pub const MAX_TEXT_LEN: usize = 100;

/// Largest value `NUMERIC(10,2)` holds.
pub const MAX_SALARY: f64 = 99_999_999.99;

impl NewEmployee {
    pub fn validate(&self) -> Result<(), AppError> {
        let texts = [
            ("name", &self.name),
            ("email", &self.email),
            ("position", &self.position),
            ("department", &self.department),
        ];
        if texts.iter().any(|(_, s)| s.trim().is_empty()) {
            return Err(AppError::ValidationError("All fields are required".into()));
        }
        for (field, value) in texts {
            validate_length(field, value)?;
        }
        validate_salary(self.salary)
    }
}

/// Counted in characters, as Postgres counts `VARCHAR(n)`.
pub fn validate_length(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::ValidationError(format!(
            "Invalid data: {} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

pub fn validate_salary(salary: f64) -> Result<(), AppError> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(AppError::ValidationError(
            "Salary must be a non-negative number".into(),
        ));
    }
    if salary > MAX_SALARY {
        return Err(AppError::ValidationError(format!(
            "Invalid data: salary must not exceed {:.2}",
            MAX_SALARY
        )));
    }
    Ok(())
}

/// A single updatable employee column with its new value.
///
/// The column name comes from this closed set, never from request input.
#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeField {
    Name(String),
    Email(String),
    Position(String),
    Department(String),
    Salary(f64),
    HireDate(NaiveDate),
}

impl EmployeeField {
    pub fn column(&self) -> &'static str {
        match self {
            EmployeeField::Name(_) => "name",
            EmployeeField::Email(_) => "email",
            EmployeeField::Position(_) => "position",
            EmployeeField::Department(_) => "department",
            EmployeeField::Salary(_) => "salary",
            EmployeeField::HireDate(_) => "hire_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(AppError::InternalError(format!("unknown role in store: {other}"))),
        }
    }
}

/// Raw `users` row as selected from the store.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub role: String,
    pub employee_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A login account. The password hash is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub employee_id: Option<i32>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password,
            role: row.role.parse()?,
            employee_id: row.employee_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}
