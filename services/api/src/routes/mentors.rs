//! Mentor and mentee directories, and mentor administration

use axum::{Router, extract::State, http::StatusCode, routing::{get, post}};
use tracing::info;
use uuid::Uuid;

use super::auth::create_account;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    middleware::AuthUser,
    models::{CreateUserRequest, Pagination, Role, UpdateUser, User},
    policy::{Access, INSUFFICIENT_PRIVILEGES, authorize},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mentors", get(list_mentors))
        .route("/mentors/create", post(create_mentor))
        .route("/mentors/approve/:id", post(approve_mentor))
        .route("/mentors/reject/:id", post(reject_mentor))
        .route("/mentors/:id", get(get_mentor))
        .route("/mentees", get(list_mentees))
        .route("/mentees/:id", get(get_mentee))
}

/// Look up a user that must carry `role`
async fn find_with_role(
    state: &AppState,
    id: Uuid,
    role: Role,
    label: &str,
) -> ApiResult<User> {
    state
        .repositories
        .users
        .find_by_id(id)
        .await?
        .filter(|user| user.role == role)
        .ok_or_else(|| ApiError::not_found(label))
}

pub async fn list_mentors(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    let mentors = state
        .repositories
        .users
        .list(Some(Role::Mentor), page)
        .await?;
    Ok(Json(mentors))
}

pub async fn get_mentor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    find_with_role(&state, id, Role::Mentor, "Mentor")
        .await
        .map(Json)
}

pub async fn list_mentees(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    let mentees = state
        .repositories
        .users
        .list(Some(Role::Mentee), page)
        .await?;
    Ok(Json(mentees))
}

pub async fn get_mentee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    find_with_role(&state, id, Role::Mentee, "Mentee")
        .await
        .map(Json)
}

/// Admin-created mentors are active immediately
pub async fn create_mentor(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    payload.role = Role::Mentor;
    let mentor = create_account(&state, payload, true).await?;
    info!("Admin {} created mentor {}", caller.id(), mentor.id);

    Ok((StatusCode::CREATED, Json(mentor)))
}

async fn set_mentor_active(
    caller: &AuthUser,
    state: &AppState,
    id: Uuid,
    is_active: bool,
) -> ApiResult<User> {
    authorize(caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;
    find_with_role(state, id, Role::Mentor, "Mentor").await?;

    let mentor = state
        .repositories
        .users
        .update(id, &UpdateUser::activation(is_active))
        .await?
        .ok_or_else(|| ApiError::not_found("Mentor"))?;
    info!("Mentor {} active={} by admin {}", id, is_active, caller.id());

    Ok(mentor)
}

pub async fn approve_mentor(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    set_mentor_active(&caller, &state, id, true).await.map(Json)
}

pub async fn reject_mentor(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    set_mentor_active(&caller, &state, id, false).await.map(Json)
}
