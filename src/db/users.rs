use super::models::{Role, User, UserRow};
use super::Store;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{on_unique_violation, AppError};

const SELECT_USER: &str = r#"
    SELECT id, username, password, role, employee_id, created_at, updated_at
    FROM users
"#;

fn username_taken() -> AppError {
    AppError::Conflict("Username already exists".to_string())
}

/// Maps login accounts to and from the `users` table.
#[derive(Clone)]
pub struct UserRepository {
    store: Store,
}

impl UserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.store.acquire_connection().await?;
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Returns the account only when both username and password match. An
    /// unknown username and a wrong password are indistinguishable.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let user = self
            .find_by_username(username)
            .await?
            .filter(|user| verify_password(password, &user.password_hash));

        Ok(user)
    }

    /// Creates a role="employee" account linked to `employee_id`.
    ///
    /// The existence check and the insert are separate statements; a
    /// concurrent signup can slip between them, in which case the unique
    /// index rejects the insert and the same conflict is reported.
    pub async fn create_employee_user(
        &self,
        username: &str,
        password: &str,
        employee_id: i32,
    ) -> Result<User, AppError> {
        if self.find_by_username(username).await?.is_some() {
            return Err(username_taken());
        }

        let password_hash = hash_password(password)?;
        let mut conn = self.store.acquire_connection().await?;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password, role, employee_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password, role, employee_id, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .bind(Role::Employee.as_str())
        .bind(employee_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| on_unique_violation(e, username_taken))?;

        User::try_from(row)
    }
}
