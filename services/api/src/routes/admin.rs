//! Admin dashboard

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    AppState,
    error::ApiResult,
    middleware::AuthUser,
    models::{DashboardStats, Role},
    policy::{Access, INSUFFICIENT_PRIVILEGES, authorize},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(dashboard))
}

pub async fn dashboard(
    caller: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<DashboardStats>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    let repos = &state.repositories;
    Ok(Json(DashboardStats {
        total_users: repos.users.count(None).await?,
        total_mentors: repos.users.count(Some(Role::Mentor)).await?,
        total_mentees: repos.users.count(Some(Role::Mentee)).await?,
        total_courses: repos.courses.count().await?,
        total_mentorships: repos.mentorships.count().await?,
    }))
}
