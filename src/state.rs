use crate::config::AppConfig;
use crate::session::{SessionStore, SqlSessions};
use crate::storage::{DashboardStore, SqlStore};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DashboardStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DashboardStore>,
        sessions: Arc<dyn SessionStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            sessions,
            config: Arc::new(config),
        }
    }

    pub fn from_pool(pool: SqlitePool, config: AppConfig) -> Self {
        Self::new(
            Arc::new(SqlStore::new(pool.clone())),
            Arc::new(SqlSessions::new(pool)),
            config,
        )
    }
}
