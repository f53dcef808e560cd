//! Mentorship platform HTTP API
//!
//! Users, the course catalog, mentorships and their meetings, agenda
//! templates and progress reports, behind bearer-token authentication and
//! role/ownership access rules.
//!
//! ```no_run
//! use common::jwt::{JwtConfig, JwtService};
//! use mentorship_api::{AppState, create_router, repositories::Repositories};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let jwt = JwtService::new(JwtConfig::new("private.pem", "public.pem", 900)?)?;
//! let app = create_router(AppState::new(Repositories::in_memory(), jwt));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod settings;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
