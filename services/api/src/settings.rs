//! Service settings
//!
//! Read from an optional `config/mentorship.{toml,yaml,json}` file, then
//! overlaid with environment variables (`BIND_ADDRESS`, `STORAGE_BACKEND`,
//! `JWT_PRIVATE_KEY`, ...). Database settings live in
//! [`common::database::DatabaseConfig`].

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Where entities are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Credentials for the super admin created at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_address: String,
    pub storage_backend: StorageBackend,
    /// PEM text or path to a PEM file
    pub jwt_private_key: String,
    /// PEM text or path to a PEM file
    pub jwt_public_key: String,
    /// Access token lifetime in seconds
    pub jwt_access_token_expiry: u64,
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Settings {
    /// Load settings from the config file and process environment
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::default().try_parsing(true))
    }

    fn from_environment(environment: Environment) -> Result<Self> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("storage_backend", "postgres")?
            .set_default("jwt_access_token_expiry", 900)?
            .add_source(File::with_name("config/mentorship").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
            .context("Invalid service settings")
    }

    /// Super admin to seed, when all three credentials are configured
    pub fn admin_seed(&self) -> Option<AdminSeed> {
        match (&self.admin_username, &self.admin_email, &self.admin_password) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}
