//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::UniqueViolation;
use crate::models::{NewUser, Pagination, Role, UpdateUser, User};

/// Persistence operations on users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: &NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_username_or_email(&self, username_or_email: &str) -> Result<Option<User>>;
    /// List users, optionally restricted to one role
    async fn list(&self, role: Option<Role>, page: Pagination) -> Result<Vec<User>>;
    async fn update(&self, id: Uuid, update: &UpdateUser) -> Result<Option<User>>;
    async fn delete(&self, id: Uuid) -> Result<Option<User>>;
    async fn count(&self, role: Option<Role>) -> Result<i64>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, role, is_active, \
                            profile_picture, bio, created_at, updated_at";

fn map_user(row: &PgRow) -> Result<User> {
    let role: String = row.try_get("role")?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse()?,
        is_active: row.try_get("is_active")?,
        profile_picture: row.try_get("profile_picture")?,
        bio: row.try_get("bio")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Turn unique-constraint failures on `users` into [`UniqueViolation`]
fn unique_violation(err: sqlx::Error) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_email_key") => return UniqueViolation::Email.into(),
                Some("users_username_key") => return UniqueViolation::Username.into(),
                _ => {}
            }
        }
    }
    err.into()
}

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new {} user: {}", new_user.role, new_user.username);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role, is_active, profile_picture, bio)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(new_user.is_active)
        .bind(&new_user.profile_picture)
        .bind(&new_user.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_violation)?;

        map_user(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_username_or_email(&self, username_or_email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1 OR email = $1
            ORDER BY created_at, id
            LIMIT 1
            "#
        ))
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn list(&self, role: Option<Role>, page: Pagination) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::TEXT IS NULL OR role = $1)
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(role.map(|r| r.as_str()))
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_user).collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateUser) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                profile_picture = COALESCE($4, profile_picture),
                bio = COALESCE($5, bio),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.profile_picture)
        .bind(&update.bio)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(unique_violation)?;

        row.as_ref().map(map_user).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn count(&self, role: Option<Role>) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR role = $1)")
                .bind(role.map(|r| r.as_str()))
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
