use crate::errors::StoreError;
use crate::models::SessionIdentity;
use axum::async_trait;
use axum::http::{HeaderMap, header::COOKIE};
use sqlx::SqlitePool;

pub const SESSION_COOKIE: &str = "dialhealth_session";

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn lookup(&self, token: &str) -> Result<Option<SessionIdentity>, StoreError>;
}

#[derive(Clone)]
pub struct SqlSessions {
    pool: SqlitePool,
}

impl SqlSessions {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqlSessions {
    async fn lookup(&self, token: &str) -> Result<Option<SessionIdentity>, StoreError> {
        sqlx::query_as::<_, SessionIdentity>(
            "SELECT username, firstname, lastname FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::new("session", err))
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
