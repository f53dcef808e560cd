//! Startup seeding of the first super admin

use anyhow::{Context, Result};
use common::password::hash_password;
use tracing::info;

use crate::{
    models::{NewUser, Role, User},
    repositories::UserRepository,
    settings::AdminSeed,
};

/// Create the configured super admin unless its email is already taken
///
/// Returns the new user, or `None` when nothing was created.
pub async fn seed_admin(users: &dyn UserRepository, seed: &AdminSeed) -> Result<Option<User>> {
    if users.find_by_email(&seed.email).await?.is_some() {
        info!("Admin account {} already present", seed.email);
        return Ok(None);
    }

    let password_hash =
        hash_password(&seed.password).context("Failed to hash admin password")?;

    let admin = users
        .create(&NewUser {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash,
            role: Role::SuperAdmin,
            is_active: true,
            profile_picture: None,
            bio: None,
        })
        .await?;

    info!("Seeded super admin {}", admin.email);
    Ok(Some(admin))
}
