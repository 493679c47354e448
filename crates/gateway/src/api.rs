//! Request handlers for the assistant API.
//!
//! Routes:
//! - `POST   /ask`                — Answer one request
//! - `POST   /sessions`           — Mint a fresh session key
//! - `GET    /history`            — Recorded exchanges, newest first
//! - `DELETE /history/{id}`       — Remove one record
//! - `GET    /history/{id}/pdf`   — Download one record as PDF
//! - `GET    /templates`          — Quick-request presets

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use switchbot_core::error::AskError;
use switchbot_core::history::HistoryRecord;
use switchbot_engine::{Assistant, DEFAULT_SESSION_ID, QUICK_REQUESTS, QuickRequest};
use switchbot_export::ExportError;
use tracing::{error, info};

/// Shared state for the API handlers.
pub struct ApiState {
    pub assistant: Arc<Assistant>,
}

pub type SharedApiState = Arc<ApiState>;

/// Brand label sent in place of a vendor when a request fails.
const ERROR_BRAND: &str = "Error";

pub fn api_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .route("/sessions", post(create_session_handler))
        .route("/history", get(list_history_handler))
        .route("/history/{id}", delete(delete_history_handler))
        .route("/history/{id}/pdf", get(pdf_handler))
        .route("/templates", get(templates_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_session")]
    pub session_id: String,
}

fn default_session() -> String {
    DEFAULT_SESSION_ID.into()
}

#[derive(Serialize, Deserialize)]
pub struct AskResponse {
    pub brand: String,
    pub answer: String,
    pub warnings: Vec<String>,
    pub record_id: String,
}

impl AskResponse {
    fn failure(answer: String) -> Self {
        Self {
            brand: ERROR_BRAND.into(),
            answer,
            warnings: Vec::new(),
            record_id: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryRecord>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<QuickRequest>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn ask_handler(
    State(state): State<SharedApiState>,
    Json(payload): Json<AskRequest>,
) -> (StatusCode, Json<AskResponse>) {
    match state
        .assistant
        .ask(&payload.query, &payload.session_id)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(AskResponse {
                brand: outcome.brand.to_string(),
                answer: outcome.answer,
                warnings: outcome.warnings,
                record_id: outcome.record_id,
            }),
        ),
        Err(AskError::EmptyQuery) => (
            StatusCode::BAD_REQUEST,
            Json(AskResponse::failure(AskError::EmptyQuery.to_string())),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AskResponse::failure(format!("❌ Error: {e}"))),
        ),
    }
}

async fn create_session_handler() -> (StatusCode, Json<SessionResponse>) {
    let session_id = uuid::Uuid::new_v4().to_string();
    info!(session = %session_id, "New session");
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

async fn list_history_handler(State(state): State<SharedApiState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.assistant.list_history().await,
    })
}

async fn delete_history_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    match state.assistant.delete_history(&id).await {
        Ok(true) => Ok(Json(DeleteResponse { success: true })),
        Ok(false) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("History record not found: {id}"),
        )),
        Err(e) => {
            error!(id = %id, "History delete failed: {e}");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn pdf_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = switchbot_export::export_pdf(state.assistant.ledger(), &id)
        .await
        .map_err(|e| match e {
            ExportError::RecordNotFound(_) => api_error(StatusCode::NOT_FOUND, e.to_string()),
            ExportError::Render(_) => {
                error!(id = %id, "PDF export failed: {e}");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        switchbot_export::file_name(&id)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

async fn templates_handler() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: QUICK_REQUESTS.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use switchbot_core::error::ProviderError;
    use switchbot_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use switchbot_history::{HistoryLedger, InMemoryStore};

    /// Lightweight mock provider for gateway tests.
    struct MockProvider {
        response_text: String,
    }

    #[async_trait::async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                content: self.response_text.clone(),
                usage: None,
                model: "mock-model".into(),
            })
        }
    }

    fn test_api_state() -> SharedApiState {
        let provider: Arc<dyn Provider> = Arc::new(MockProvider {
            response_text: "1. enable\n2. configure terminal\n3. vlan 10\n4. end\n5. write memory"
                .into(),
        });
        let ledger = Arc::new(HistoryLedger::new(Arc::new(InMemoryStore::new())));
        Arc::new(ApiState {
            assistant: Arc::new(Assistant::new(provider, ledger)),
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn ask(state: &SharedApiState, body: &str) -> (StatusCode, AskResponse) {
        let response = api_router(state.clone())
            .oneshot(post_json("/ask", body))
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn ask_returns_brand_answer_and_record_id() {
        let state = test_api_state();
        let (status, json) = ask(&state, r#"{"query":"create vlan 10 cisco","session_id":"s1"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.brand, "Cisco");
        assert!(json.answer.starts_with("1. enable"));
        assert!(json.warnings.is_empty());
        assert_eq!(json.record_id.len(), 20);
    }

    #[tokio::test]
    async fn ask_without_session_uses_default() {
        let state = test_api_state();
        let (status, _) = ask(&state, r#"{"query":"vlan aruba"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.assistant.session_turns("default").await.len(), 2);
    }

    #[tokio::test]
    async fn empty_query_is_bad_request() {
        let state = test_api_state();
        let (status, json) = ask(&state, r#"{"query":"   "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json.brand, "Error");
        assert_eq!(json.answer, "Empty query");
        assert!(json.record_id.is_empty());
        assert!(state.assistant.list_history().await.is_empty());
    }

    #[tokio::test]
    async fn history_lists_newest_first() {
        let state = test_api_state();
        ask(&state, r#"{"query":"first cisco"}"#).await;
        ask(&state, r#"{"query":"second cisco"}"#).await;

        let req = Request::builder().uri("/history").body(Body::empty()).unwrap();
        let response = api_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: HistoryResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.history.len(), 2);
        assert_eq!(json.history[0].query, "second cisco");
    }

    #[tokio::test]
    async fn delete_known_then_unknown() {
        let state = test_api_state();
        let (_, created) = ask(&state, r#"{"query":"vlan cisco"}"#).await;

        let uri = format!("/history/{}", created.record_id);
        let req = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let response = api_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: DeleteResponse = serde_json::from_slice(&body).unwrap();
        assert!(json.success);

        let req = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let response = api_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn pdf_download() {
        let state = test_api_state();
        let (_, created) = ask(&state, r#"{"query":"vlan cisco"}"#).await;

        let req = Request::builder()
            .uri(format!("/history/{}/pdf", created.record_id))
            .body(Body::empty())
            .unwrap();
        let response = api_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains(&format!("switch_config_{}.pdf", created.record_id)));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"%PDF-"));

        let req = Request::builder()
            .uri("/history/missing/pdf")
            .body(Body::empty())
            .unwrap();
        let response = api_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn new_session_returns_fresh_key() {
        let state = test_api_state();
        let req = Request::builder()
            .method("POST")
            .uri("/sessions")
            .body(Body::empty())
            .unwrap();
        let response = api_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: SessionResponse = serde_json::from_slice(&body).unwrap();
        assert!(uuid::Uuid::parse_str(&json.session_id).is_ok());
    }

    #[tokio::test]
    async fn templates_are_listed() {
        let req = Request::builder().uri("/templates").body(Body::empty()).unwrap();
        let response = api_router(test_api_state()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["templates"].as_array().unwrap().len(), 5);
    }
}
