//!
//! hierchat HTTP server
//! --------------------
//! Axum-based chat transport. Every request is one chat turn; no conversation
//! state is kept between requests.
//!
//! Routes:
//! - `GET /`         liveness text
//! - `GET /welcome`  greeting with example-question shortcuts
//! - `POST /chat`    `{"message": "..."}` -> `{"status":"ok","messages":[...]}`
//! - `POST /action`  `{"query": "..."}` (a clicked shortcut) -> same shape as /chat

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::chat::{ChatMessage, ChatService};
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::storage::HierarchyStore;

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
}

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionPayload {
    pub query: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "hierchat ok" }))
        .route("/welcome", get(welcome))
        .route("/chat", post(chat_handler))
        .route("/action", post(action_handler))
        .with_state(state)
}

/// Open the data source and serve until the listener fails.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    info!(
        target: "startup",
        "hierchat starting: data_path={:?}, http_port={}",
        settings.data_path, settings.http_port
    );
    let store = HierarchyStore::open(&settings.data_path)?;
    let state = AppState { chat: ChatService::new(Arc::new(store)) };
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", settings.http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn welcome(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({"status": "ok", "messages": [state.chat.welcome()]}))
}

async fn chat_handler(State(state): State<AppState>, Json(payload): Json<ChatPayload>) -> impl IntoResponse {
    if let Err(e) = require_text(&payload.message, "message") {
        return respond(Err(e));
    }
    let chat = state.chat.clone();
    respond(run_blocking(move || chat.handle_message(&payload.message)).await)
}

async fn action_handler(State(state): State<AppState>, Json(payload): Json<ActionPayload>) -> impl IntoResponse {
    if let Err(e) = require_text(&payload.query, "query") {
        return respond(Err(e));
    }
    let chat = state.chat.clone();
    respond(run_blocking(move || chat.select_action(&payload.query)).await)
}

fn require_text(text: &str, field: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::user("empty_input", format!("'{}' must not be empty", field)));
    }
    Ok(())
}

// Loading reads Parquet from disk; keep it off the async workers.
async fn run_blocking<F>(f: F) -> AppResult<Vec<ChatMessage>>
where
    F: FnOnce() -> AppResult<Vec<ChatMessage>> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(res) => res,
        Err(e) => Err(AppError::internal("join_error", e.to_string())),
    }
}

fn respond(res: AppResult<Vec<ChatMessage>>) -> (StatusCode, Json<serde_json::Value>) {
    match res {
        Ok(messages) => (StatusCode::OK, Json(json!({"status": "ok", "messages": messages}))),
        Err(e) => {
            error!(target: "hierchat::server", "chat turn failed: {e}");
            let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({"status": "error", "error": e.message(), "code": e.code_str()})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::UNSUPPORTED_REPLY;
    use crate::interpreter::{HierarchyLevel, MetricKind};
    use crate::storage::{HierarchySource, HierarchyTotal};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    struct FixedSource(Vec<HierarchyTotal>);

    impl HierarchySource for FixedSource {
        fn load(&self, _: HierarchyLevel, _: MetricKind, _: NaiveDate, _: NaiveDate) -> AppResult<Vec<HierarchyTotal>> {
            Ok(self.0.clone())
        }
    }

    fn app() -> Router {
        let source = FixedSource(vec![
            HierarchyTotal { label: "H00".into(), value: 30.0 },
            HierarchyTotal { label: "H01".into(), value: 10.0 },
        ]);
        router(AppState { chat: ChatService::new(Arc::new(source)) })
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn chat_route_answers_with_chart() {
        let (status, body) = post_json("/chat", json!({"message": "Show the relative total revenue of hierarchy 1 in 2019"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[3]["chart"]["name"], "hierarchy1_revenue_treemap");
    }

    #[tokio::test]
    async fn action_route_echoes_selection() {
        let (status, body) = post_json("/action", json!({"query": "What is the weather today?"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["content"], "✅ You selected: **What is the weather today?**");
        assert_eq!(body["messages"][1]["content"], UNSUPPORTED_REPLY);
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let (status, body) = post_json("/chat", json!({"message": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "empty_input");
    }

    #[tokio::test]
    async fn welcome_route_lists_examples() {
        let resp = app().oneshot(Request::builder().uri("/welcome").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["messages"][0]["actions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn respond_maps_errors_to_status() {
        let (status, Json(body)) = respond(Err(AppError::not_found("source_missing", "gone")));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "source_missing");

        let (status, Json(body)) = respond(Ok(vec![ChatMessage::text("hi")]));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["content"], "hi");
        assert!(body["messages"][0].get("chart").is_none());
    }
}
