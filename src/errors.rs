use axum::http::StatusCode;
use tracing::error;

#[derive(Debug, thiserror::Error)]
#[error("query for {section} failed: {source}")]
pub struct StoreError {
    pub section: &'static str,
    #[source]
    pub source: sqlx::Error,
}

impl StoreError {
    pub fn new(section: &'static str, source: sqlx::Error) -> Self {
        Self { section, source }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        error!(section = err.section, error = %err.source, "dashboard query failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Database error: unable to load {}.", err.section),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
