//! Registration and token issuing

use axum::{Router, extract::State, http::StatusCode, routing::post};
use common::password::{hash_password, verify_password};
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::Json,
    models::{CreateUserRequest, LoginRequest, NewUser, Role, TokenResponse, User},
    repositories::UniqueViolation,
    validation::validate_new_user,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(login))
}

/// Hash the password and store a new account after the shared checks
///
/// Used by self-registration and by admin mentor creation.
pub(crate) async fn create_account(
    state: &AppState,
    request: CreateUserRequest,
    is_active: bool,
) -> ApiResult<User> {
    validate_new_user(&request).map_err(ApiError::BadRequest)?;

    let users = &state.repositories.users;
    if users.find_by_email(&request.email).await?.is_some() {
        return Err(UniqueViolation::Email.into());
    }
    if users.find_by_username(&request.username).await?.is_some() {
        return Err(UniqueViolation::Username.into());
    }

    let password_hash = hash_password(&request.password)?;
    let user = users
        .create(&NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role: request.role,
            is_active,
            profile_picture: request.profile_picture,
            bio: request.bio,
        })
        .await?;

    Ok(user)
}

/// Self-registration for mentees and mentors
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    if payload.role.is_admin() {
        return Err(ApiError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    // Mentors wait for admin approval
    let is_active = payload.role == Role::Mentee;
    let user = create_account(&state, payload, is_active).await?;
    info!("Registered {} {}", user.role, user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange a username or email and password for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .repositories
        .users
        .find_by_username_or_email(&payload.username)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!("Failed login for user {}", user.id);
        return Err(ApiError::Unauthorized);
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, user.role.as_str())?;
    info!("Issued access token for user {}", user.id);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    }))
}
