use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::models::{Employee, EmployeeField, NewEmployee};
use super::Store;
use crate::error::{on_unique_violation, AppError};

const SELECT_EMPLOYEE: &str = r#"
    SELECT id, name, email, position, department, salary::float8 AS salary,
           hire_date, created_at, updated_at
    FROM employees
"#;

fn duplicate_email(email: &str) -> AppError {
    AppError::Conflict(format!("Email already exists: {}", email))
}

/// Maps employee records to and from the `employees` table.
#[derive(Clone)]
pub struct EmployeeRepository {
    store: Store,
}

impl EmployeeRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Validates and inserts a new employee, returning the assigned id.
    pub async fn create(&self, employee: &NewEmployee) -> Result<i32, AppError> {
        self.save(None, employee).await
    }

    /// Full-record write: UPDATE when `id` is set, INSERT otherwise.
    pub async fn save(&self, id: Option<i32>, employee: &NewEmployee) -> Result<i32, AppError> {
        employee.validate()?;
        let mut conn = self.store.acquire_connection().await?;

        match id {
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE employees
                    SET name = $1, email = $2, position = $3, department = $4,
                        salary = $5, hire_date = $6, updated_at = CURRENT_TIMESTAMP
                    WHERE id = $7
                    "#,
                )
                .bind(&employee.name)
                .bind(&employee.email)
                .bind(&employee.position)
                .bind(&employee.department)
                .bind(employee.salary)
                .bind(employee.hire_date)
                .bind(id)
                .execute(&mut *conn)
                .await
                .map_err(|e| on_unique_violation(e, || duplicate_email(&employee.email)))?;

                if result.rows_affected() == 0 {
                    return Err(AppError::employee_not_found());
                }
                Ok(id)
            }
            None => Self::insert_with(&mut *conn, employee).await,
        }
    }

    /// Inserts on a caller-supplied connection. Does not validate.
    pub async fn insert_with(
        conn: &mut PgConnection,
        employee: &NewEmployee,
    ) -> Result<i32, AppError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO employees (name, email, position, department, salary, hire_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(employee.hire_date)
        .fetch_one(conn)
        .await
        .map_err(|e| on_unique_violation(e, || duplicate_email(&employee.email)))?;

        Ok(id)
    }

    /// Absence is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let mut conn = self.store.acquire_connection().await?;
        let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(employee)
    }

    /// All employees, most recently created first.
    pub async fn get_all(&self) -> Result<Vec<Employee>, AppError> {
        let mut conn = self.store.acquire_connection().await?;
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "{SELECT_EMPLOYEE} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        Ok(employees)
    }

    /// Applies the given fields only. Returns `false` when no row matched or
    /// there was nothing to set.
    pub async fn update_profile(
        &self,
        id: i32,
        fields: &[EmployeeField],
    ) -> Result<bool, AppError> {
        if fields.is_empty() {
            return Ok(false);
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE employees SET ");
        for field in fields {
            query.push(field.column()).push(" = ");
            match field {
                EmployeeField::Name(v)
                | EmployeeField::Email(v)
                | EmployeeField::Position(v)
                | EmployeeField::Department(v) => query.push_bind(v.clone()),
                EmployeeField::Salary(v) => query.push_bind(*v),
                EmployeeField::HireDate(v) => query.push_bind(*v),
            };
            query.push(", ");
        }
        query.push("updated_at = CURRENT_TIMESTAMP WHERE id = ").push_bind(id);

        let mut conn = self.store.acquire_connection().await?;
        let result = query.build().execute(&mut *conn).await.map_err(|e| {
            on_unique_violation(e, || {
                let email = fields.iter().find_map(|f| match f {
                    EmployeeField::Email(email) => Some(email.as_str()),
                    _ => None,
                });
                duplicate_email(email.unwrap_or_default())
            })
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns whether the row existed.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut conn = self.store.acquire_connection().await?;
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let mut conn = self.store.acquire_connection().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}
