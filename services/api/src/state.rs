//! Application state shared across handlers

use std::sync::Arc;

use common::jwt::JwtService;

use crate::repositories::Repositories;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(repositories: Repositories, jwt_service: JwtService) -> Self {
        Self {
            repositories,
            jwt_service: Arc::new(jwt_service),
        }
    }
}
