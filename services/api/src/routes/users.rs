//! User account routes

use axum::{Router, extract::State, routing::get};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    middleware::AuthUser,
    models::{Pagination, UpdateUser, User},
    policy::{Access, INSUFFICIENT_PRIVILEGES, authorize},
    repositories::UniqueViolation,
    validation::validate_user_update,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(current_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub async fn list_users(
    caller: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    let users = state.repositories.users.list(None, page).await?;
    Ok(Json(users))
}

pub async fn current_user(caller: AuthUser) -> Json<User> {
    Json(caller.user)
}

pub async fn get_user(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    authorize(
        &caller,
        Access::SelfOrAdmin { user_id: id },
        "Not authorized to view this user",
    )?;

    let user = state
        .repositories
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user))
}

/// Partial profile update; role and activation cannot be changed here
pub async fn update_user(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<Json<User>> {
    authorize(
        &caller,
        Access::SelfOrAdmin { user_id: id },
        "Not authorized to update this user",
    )?;
    validate_user_update(&payload).map_err(ApiError::BadRequest)?;

    let users = &state.repositories.users;
    if let Some(email) = &payload.email {
        if users.find_by_email(email).await?.is_some_and(|holder| holder.id != id) {
            return Err(UniqueViolation::Email.into());
        }
    }
    if let Some(username) = &payload.username {
        if users.find_by_username(username).await?.is_some_and(|holder| holder.id != id) {
            return Err(UniqueViolation::Username.into());
        }
    }

    let user = users
        .update(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user))
}

pub async fn delete_user(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    let user = state
        .repositories
        .users
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    info!("Deleted user {}", user.id);

    Ok(Json(user))
}
