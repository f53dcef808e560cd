//! API service routes

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod meetings;
pub mod mentors;
pub mod mentorships;
pub mod reports;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(auth::router())
        .merge(users::router())
        .merge(mentors::router())
        .merge(catalog::router())
        .merge(mentorships::router())
        .merge(meetings::router())
        .merge(reports::router())
        .merge(admin::router())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mentorship-api"
    }))
}
