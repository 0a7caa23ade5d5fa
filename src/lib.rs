pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod inventory;
pub mod middleware;
pub mod pricing;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

// The connection sits behind an Arc rather than relying on
// DatabaseConnection's own Clone, which sea-orm drops when the mock
// feature is enabled (as it is for the test profile).
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clone<T: Clone>() {}

    #[test]
    fn app_state_is_clone() {
        assert_clone::<AppState>();
    }
}
