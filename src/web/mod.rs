use axum::{Router, http::Method, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;

use routes::forum_routes;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(db_pool: DatabaseConnection) -> Router {
    let app_state = Arc::new(AppState { db_pool });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest("/api/forums", forum_routes::forum_router())
        .with_state(app_state)
        .layer(cors)
}
