//! Database module for the employer dashboard
//!
//! `Store` owns the connection pool and the table schema; the repositories
//! map employees and user accounts onto it.

pub mod employees;
pub mod models;
pub mod users;

pub use employees::EmployeeRepository;
pub use models::{Employee, EmployeeField, NewEmployee, Role, User};
pub use users::UserRepository;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::auth::password::hash_password;
use crate::config::{BootstrapConfig, DatabaseConfig};
use crate::error::AppError;

/// Arbitrary key serializing schema setup across processes.
const SCHEMA_LOCK_KEY: i64 = 0x0e_d0_a5_b0;

const CREATE_EMPLOYEES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL UNIQUE,
        position VARCHAR(100) NOT NULL,
        department VARCHAR(100) NOT NULL,
        salary NUMERIC(10, 2) NOT NULL CHECK (salary >= 0),
        hire_date DATE NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(50) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        role VARCHAR(16) NOT NULL DEFAULT 'employee' CHECK (role IN ('admin', 'employee')),
        employee_id INTEGER REFERENCES employees(id) ON DELETE SET NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Connection-acquisition facade over the relational store.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
    database: String,
}

impl Store {
    /// Builds the pool without connecting; the first operation opens a
    /// connection, so an unreachable store never blocks startup.
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        Self {
            pool,
            database: config.name.clone(),
        }
    }

    /// Borrows a live connection for the duration of one operation.
    pub async fn acquire_connection(&self) -> Result<PoolConnection<Postgres>, AppError> {
        match self.pool.acquire().await {
            Ok(conn) => {
                debug!("Connected to database: {}", self.database);
                Ok(conn)
            }
            Err(e) => {
                error!("Error connecting to database {}: {}", self.database, e);
                Err(e.into())
            }
        }
    }

    /// Creates missing tables and the bootstrap admin account. Safe to run on
    /// every start.
    pub async fn initialize(&self, bootstrap: &BootstrapConfig) -> Result<(), AppError> {
        info!("Initializing database tables...");
        let mut conn = self.acquire_connection().await?;
        let mut tx = sqlx::Connection::begin(&mut *conn).await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        sqlx::query(CREATE_EMPLOYEES_TABLE).execute(&mut *tx).await?;
        info!("Employees table checked/created");
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;
        info!("Users table checked/created");

        let password_hash = hash_password(&bootstrap.admin_password)?;
        let created = sqlx::query(
            r#"
            INSERT INTO users (username, password, role)
            VALUES ($1, $2, 'admin')
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&bootstrap.admin_username)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if created > 0 {
            info!("Default admin user created (username: {})", bootstrap.admin_username);
        } else {
            info!("Admin user already exists");
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Database initialization completed; total employees: {}", count);
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
