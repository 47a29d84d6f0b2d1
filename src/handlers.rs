use crate::errors::AppError;
use crate::models::{DashboardView, SessionIdentity};
use crate::session::session_token;
use crate::state::AppState;
use crate::stats::DashboardAggregator;
use crate::ui::render_dashboard;
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let Some(identity) = current_identity(&state, &headers).await? else {
        debug!(login_url = %state.config.login_url, "no session identity, redirecting to login");
        return Ok(Redirect::to(&state.config.login_url).into_response());
    };

    let view = DashboardAggregator::new(state.store.as_ref()).build(&identity).await?;
    Ok(Html(render_dashboard(&identity, &view)).into_response())
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, AppError> {
    let identity = current_identity(&state, &headers)
        .await?
        .ok_or_else(|| AppError::unauthorized("not signed in"))?;

    let view = DashboardAggregator::new(state.store.as_ref()).build(&identity).await?;
    Ok(Json(view))
}

pub async fn health() -> &'static str {
    "ok"
}

async fn current_identity(state: &AppState, headers: &HeaderMap) -> Result<Option<SessionIdentity>, AppError> {
    let Some(token) = session_token(headers) else {
        debug!("request carries no session cookie");
        return Ok(None);
    };

    let identity = state.sessions.lookup(&token).await?;
    match &identity {
        Some(identity) => debug!(username = %identity.username, "session resolved"),
        None => debug!("session token not recognised"),
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use crate::app::router;
    use crate::config::AppConfig;
    use crate::models::SessionIdentity;
    use crate::state::AppState;
    use crate::stats::tests::{MemorySessions, MemoryStore};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        let sessions = MemorySessions::default();
        sessions.insert("tok-ada", SessionIdentity::new("ada").with_name("Ada", "Lovelace"));
        sessions.insert("tok-grace", SessionIdentity::new("grace"));
        AppState::new(store, Arc::new(sessions), AppConfig::default())
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.add_reading("ada", 100.0, "2026-01-01 08:00:00");
        store.add_reading("ada", 110.0, "2026-01-02 08:00:00");
        store.add_reading("ada", 120.0, "2026-01-03 08:00:00");
        store.add_meal("breakfast", 300.0);
        store.add_meal("dinner", 700.0);
        store
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("dialhealth_session={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn anonymous_request_redirects_without_queries() {
        let store = Arc::new(seeded_store());
        let app = router(state_with(store.clone()));

        let response = app.oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_token_redirects_without_queries() {
        let store = Arc::new(seeded_store());
        let app = router(state_with(store.clone()));

        let response = app.oneshot(get("/", Some("stale"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn signed_in_user_gets_rendered_dashboard() {
        let store = Arc::new(seeded_store());
        let app = router(state_with(store.clone()));

        let response = app.oneshot(get("/", Some("tok-ada"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Welcome Ada Lovelace!"));
        assert!(html.contains("110 mg/dL"));
        assert!(html.contains("1000 kcal"));
        assert!(html.contains("<td>Breakfast</td>"));
        assert_eq!(store.calls(), 6);
    }

    #[tokio::test]
    async fn query_failure_refuses_to_render() {
        let mut store = seeded_store();
        store.fail_section = Some("glucose summary");
        let app = router(state_with(Arc::new(store)));

        let response = app.oneshot(get("/", Some("tok-ada"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, "Database error: unable to load glucose summary.");
    }

    #[tokio::test]
    async fn api_dashboard_requires_session() {
        let app = router(state_with(Arc::new(seeded_store())));
        let response = app.oneshot(get("/api/dashboard", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn api_dashboard_shares_meals_across_users() {
        let state = state_with(Arc::new(seeded_store()));

        let ada = router(state.clone())
            .oneshot(get("/api/dashboard", Some("tok-ada")))
            .await
            .unwrap();
        let grace = router(state)
            .oneshot(get("/api/dashboard", Some("tok-grace")))
            .await
            .unwrap();

        let ada: serde_json::Value = serde_json::from_str(&body_text(ada).await).unwrap();
        let grace: serde_json::Value = serde_json::from_str(&body_text(grace).await).unwrap();
        assert_eq!(ada["recent_meals"], grace["recent_meals"]);
        assert_eq!(ada["total_calories"], grace["total_calories"]);
        assert_eq!(ada["avg_glucose"], serde_json::json!(110.0));
        assert_eq!(grace["avg_glucose"], serde_json::Value::Null);
        assert_eq!(grace["recent_health"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn health_check_needs_no_session() {
        let app = router(state_with(Arc::new(MemoryStore::default())));
        let response = app.oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }
}
