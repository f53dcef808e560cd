use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{
    database::{DatabaseConfig, apply_schema, health_check, init_pool},
    jwt::{JwtConfig, JwtService},
};
use mentorship_api::{
    AppState, bootstrap, create_router,
    repositories::Repositories,
    schema,
    settings::{Settings, StorageBackend},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting mentorship API");

    let settings = Settings::load()?;

    let repositories = match settings.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            apply_schema(&pool, schema::STATEMENTS).await?;
            info!("Database schema is up to date");

            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            Repositories::in_memory()
        }
    };

    if let Some(seed) = settings.admin_seed() {
        bootstrap::seed_admin(repositories.users.as_ref(), &seed).await?;
    }

    let jwt_config = JwtConfig::new(
        &settings.jwt_private_key,
        &settings.jwt_public_key,
        settings.jwt_access_token_expiry,
    )?;
    let app = create_router(AppState::new(repositories, JwtService::new(jwt_config)?));

    let listener = TcpListener::bind(&settings.bind_address).await?;
    info!("Mentorship API listening on {}", settings.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
