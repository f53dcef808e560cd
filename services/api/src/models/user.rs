//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Platform role carried by every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Mentee,
    Mentor,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentee => "mentee",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Admins and super admins share every administrative privilege
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentee" => Ok(Role::Mentee),
            "mentor" => Ok(Role::Mentor),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(anyhow::anyhow!("Unknown role: {}", other)),
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload, with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
}

/// Request for user registration and mentor creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
}

/// User update payload
///
/// `is_active` is only set by mentor approval, never by clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    #[serde(skip)]
    pub is_active: Option<bool>,
}

impl UpdateUser {
    pub fn activation(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(profile_picture) = &self.profile_picture {
            user.profile_picture = Some(profile_picture.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
    }
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

/// Response for token generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
