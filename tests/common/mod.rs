#![allow(dead_code)]

use chrono::NaiveDate;
use employer_dashboard::db::NewEmployee;
use employer_dashboard::{AppState, Settings};

/// Builds the full application (CORS, preflight rewrite, routes) around a state.
#[allow(unused_macros)]
macro_rules! test_app {
    ($state:expr) => {{
        let settings = $state.config.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(employer_dashboard::api::cors(&settings.cors))
                .wrap(actix_web::middleware::from_fn(
                    employer_dashboard::api::preflight_no_content,
                ))
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(employer_dashboard::api::configure),
        )
        .await
    }};
}

/// State whose store points at a port nothing listens on. Requests that fail
/// validation never reach it; everything else sees an unavailable store.
pub fn offline_state() -> AppState {
    let mut settings = Settings::new().expect("Failed to load settings");
    settings.database.host = "127.0.0.1".into();
    settings.database.port = 9;
    settings.database.max_connections = 1;
    settings.database.acquire_timeout_secs = 1;
    AppState::new(settings)
}

/// State backed by the PostgreSQL configured through `APP_DATABASE__*` or
/// `DB_*`, with the schema and bootstrap admin in place.
pub async fn live_state() -> AppState {
    let settings = Settings::new().expect("Failed to load settings");
    let state = AppState::new(settings);
    state
        .store
        .initialize(&state.config.bootstrap)
        .await
        .expect("Failed to initialize test database");
    state
}

pub fn unique_email() -> String {
    format!("{}@example.com", uuid::Uuid::new_v4())
}

pub fn unique_username() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

pub fn new_employee(email: &str) -> NewEmployee {
    NewEmployee {
        name: "Test Employee".into(),
        email: email.into(),
        position: "Analyst".into(),
        department: "Finance".into(),
        salary: 4200.5,
        hire_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    }
}

pub fn employee_payload(email: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Test Employee",
        "email": email,
        "position": "Analyst",
        "department": "Finance",
        "salary": 4200.5,
        "hire_date": "2024-02-29"
    })
}
