use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{auth, cards, dashboards, notifications, settings};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1",
              Router::new()
                  .merge(auth::router())
                  .merge(dashboards::router())
                  .merge(cards::router())
                  .merge(settings::router())
                  .merge(notifications::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
        .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn call(method: &str, uri: &str) -> StatusCode {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(call("GET", "/api/v1/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn catalog_is_public() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .uri("/api/v1/visibility-catalog")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["tiers"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        assert_eq!(call("GET", "/api/v1/dashboards").await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("GET", "/api/v1/me").await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("GET", "/api/v1/notifications").await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("GET", "/api/v1/admin/settings").await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            call("DELETE", &format!("/api/v1/dashboards/{}", uuid::Uuid::new_v4())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        assert_eq!(call("GET", "/api/v1/nope").await, StatusCode::NOT_FOUND);
    }
}
