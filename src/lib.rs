pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use actix_web::{web, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use db::{EmployeeRepository, Store, UserRepository};

/// Root liveness probe.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Employer Dashboard API is running!")
}

/// Health check endpoint handler
/// Reports store reachability and roster size alongside the server timestamp
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let employees = state.employees.count().await.ok();
    let store_up = employees.is_some();

    HttpResponse::Ok().json(serde_json::json!({
        "status": if store_up { "healthy" } else { "degraded" },
        "store": if store_up { "up" } else { "down" },
        "employees": employees,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Store,
    pub employees: EmployeeRepository,
    pub users: UserRepository,
}

impl AppState {
    pub fn new(config: Settings) -> Self {
        let store = Store::new(&config.database);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Settings, store: Store) -> Self {
        Self {
            employees: EmployeeRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            config: Arc::new(config),
            store,
        }
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}
