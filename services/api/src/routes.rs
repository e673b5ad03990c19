use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use talentflow::analytics::{analytics_router, AnalyticsSession, EntityQuery};

pub(crate) fn with_analytics_routes<Q>(session: Arc<AnalyticsSession<Q>>) -> axum::Router
where
    Q: EntityQuery + 'static,
{
    analytics_router(session)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::infra::InMemoryEntityStore;
    use axum::body::Body;
    use axum::http::Request;
    use talentflow::analytics::{FixedApplicationCounts, SessionSettings};
    use tower::ServiceExt;

    fn session(store: InMemoryEntityStore) -> Arc<AnalyticsSession<InMemoryEntityStore>> {
        Arc::new(AnalyticsSession::with_counts(
            Arc::new(store),
            Arc::new(FixedApplicationCounts(20)),
            SessionSettings::default(),
        ))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn refresh_then_export_over_http() {
        let router = with_analytics_routes(session(InMemoryEntityStore::new(Dataset::demo())));

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/analytics/refresh")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["status"], "ready");
        assert_eq!(
            payload["snapshot"]["top_jobs"][0]["title"],
            "Senior Backend Engineer"
        );
        assert_eq!(payload["snapshot"]["top_jobs"][0]["applications"], 20);

        let response = router
            .oneshot(
                Request::get("/api/v1/analytics/export")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::CONTENT_DISPOSITION));
    }

    #[tokio::test]
    async fn offline_store_surfaces_failed_state() {
        let store = InMemoryEntityStore::new(Dataset::demo());
        store.set_offline(true);
        let router = with_analytics_routes(session(store));

        let response = router
            .oneshot(
                Request::post("/api/v1/analytics/refresh")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let payload = body_json(response).await;
        assert_eq!(payload["status"], "failed");
        assert_eq!(payload["error"], "entity store is offline");
    }
}
