//! HTTP API gateway for the switch command assistant.
//!
//! Exposes the assistant's `ask`, history and export operations as a small
//! JSON API, plus a health check.
//!
//! Built on Axum.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header, request::Parts};
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use switchbot_engine::Assistant;
use switchbot_history::{HistoryLedger, JsonFileStore};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

pub use api::{ApiState, SharedApiState};

/// Build the full router.
///
/// Layers applied:
/// - CORS restricted to local origins
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(is_local_origin))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .merge(api::api_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn is_local_origin(origin: &HeaderValue, _parts: &Parts) -> bool {
    let origin = origin.as_bytes();
    [&b"http://localhost"[..], b"http://127.0.0.1"]
        .iter()
        .any(|prefix| {
            origin.starts_with(prefix)
                && matches!(origin.get(prefix.len()), None | Some(b':'))
        })
}

/// Wire an [`Assistant`] from config: default provider, JSON-file history.
pub fn build_assistant(
    config: &switchbot_config::AppConfig,
) -> Result<Assistant, Box<dyn std::error::Error>> {
    let router = switchbot_providers::router::build_from_config(config);
    let provider = router.default().ok_or_else(|| {
        format!(
            "Provider '{}' is not configured. Run `switchbot onboard` and set an API key.",
            config.default_provider
        )
    })?;

    let store = JsonFileStore::new(config.history_path());
    let ledger = Arc::new(HistoryLedger::with_max_records(
        Arc::new(store),
        config.history.max_records,
    ));

    Ok(Assistant::from_config(config, provider, ledger))
}

/// Start the gateway HTTP server.
pub async fn start(config: switchbot_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let assistant = Arc::new(build_assistant(&config)?);
    info!(
        provider = assistant.generator().provider_name(),
        history = %config.history_path().display(),
        "Assistant ready"
    );

    let app = build_router(Arc::new(ApiState { assistant }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> SharedApiState {
        let config = switchbot_config::AppConfig::default();
        let dir = std::env::temp_dir().join(format!("switchbot-gw-{}", uuid::Uuid::new_v4()));
        let config = switchbot_config::AppConfig {
            history: switchbot_config::HistoryConfig {
                path: Some(dir.join("history.json").display().to_string()),
                ..config.history
            },
            ..config
        };
        Arc::new(ApiState {
            assistant: Arc::new(build_assistant(&config).unwrap()),
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = build_router(test_state());
        let query = "x".repeat(2 * 1024 * 1024);
        let req = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"query":"{query}"}}"#)))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn cors_allows_only_local_origins() {
        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:5000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5000"
        );

        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost.evil.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }
}
