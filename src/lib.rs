pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use config::JwtSettings;
use repositories::{SqliteUserRepository, UserRepository};
use services::{AuthService, DataAnalysisService, TokenService, UserService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub analysis_service: Arc<DataAnalysisService>,
}

impl AppState {
    /// Wires the SQLite-backed services around a single pool.
    pub fn new(pool: sqlx::SqlitePool, jwt: &JwtSettings) -> Self {
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository, TokenService::new(jwt))),
            analysis_service: Arc::new(DataAnalysisService::new()),
        }
    }
}
