//! Bearer token authentication
//!
//! Handlers that need a caller take an [`AuthUser`] argument. Extraction
//! validates the JWT, then reloads the user so that deleted or deactivated
//! accounts lose access before their token expires.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Role, User},
    state::AppState,
};

/// Authenticated caller, loaded from the store
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self { user }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let claims = state
            .jwt_service
            .validate_token(bearer.token())
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                ApiError::Unauthorized
            })?;

        let user = state
            .repositories
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Token subject {} no longer exists", claims.sub);
                ApiError::Unauthorized
            })?;

        if !user.is_active {
            return Err(ApiError::bad_request("Inactive user"));
        }

        Ok(AuthUser { user })
    }
}
