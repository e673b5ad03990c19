use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::query::EntityQuery;
use super::session::{AnalyticsSession, SessionState};

/// Router builder exposing the dashboard analytics and its CSV export.
pub fn analytics_router<Q>(session: Arc<AnalyticsSession<Q>>) -> Router
where
    Q: EntityQuery + 'static,
{
    Router::new()
        .route("/api/v1/analytics", get(state_handler::<Q>))
        .route("/api/v1/analytics/refresh", post(refresh_handler::<Q>))
        .route("/api/v1/analytics/export", get(export_handler::<Q>))
        .with_state(session)
}

pub(crate) async fn state_handler<Q>(State(session): State<Arc<AnalyticsSession<Q>>>) -> Response
where
    Q: EntityQuery + 'static,
{
    (StatusCode::OK, axum::Json(session.state().view())).into_response()
}

pub(crate) async fn refresh_handler<Q>(
    State(session): State<Arc<AnalyticsSession<Q>>>,
) -> Response
where
    Q: EntityQuery + 'static,
{
    let state = session.refresh().await;
    let status = match state {
        SessionState::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, axum::Json(state.view())).into_response()
}

pub(crate) async fn export_handler<Q>(State(session): State<Arc<AnalyticsSession<Q>>>) -> Response
where
    Q: EntityQuery + 'static,
{
    match session.export_artifact(Utc::now().date_naive()) {
        Ok(Some(artifact)) => {
            let headers = [
                (
                    header::CONTENT_TYPE,
                    format!("{}; charset=utf-8", artifact.media_type),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ),
            ];
            (StatusCode::OK, headers, artifact.contents).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
