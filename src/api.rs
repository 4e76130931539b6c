//! HTTP + WebSocket API for the chatbot service
//!
//! Maps inbound payloads to ConversationService calls and results back
//! to JSON responses and socket events.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::ChatbotError;
use crate::service::ConversationService;
use crate::store::ConversationRecord;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// =============================
/// Response Models
/// =============================

/// History entry shape: the stored record minus identifiers.
#[derive(Debug, Serialize)]
struct HistoryEntry {
    message: String,
    response: String,
    sentiment: f64,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<ConversationRecord> for HistoryEntry {
    fn from(record: ConversationRecord) -> Self {
        Self {
            message: record.message,
            response: record.response,
            sentiment: record.sentiment,
            timestamp: record.timestamp,
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<ConversationService>,
}

/// =============================
/// Error Mapping
/// =============================

fn error_response(err: &ChatbotError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is_client_error() {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
    } else {
        error!("Exchange failed: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Internal server error" })),
        )
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let message = req.message.unwrap_or_default();
    let user_id = req.user_id.unwrap_or_else(|| "anonymous".to_string());
    let session_id = req.session_id.unwrap_or_else(|| "default".to_string());

    match state
        .service
        .handle_message(&message, &user_id, &session_id)
        .await
    {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => (StatusCode::OK, Json(value)),
            Err(e) => error_response(&ChatbotError::Serialization(e)),
        },
        Err(e) => error_response(&e),
    }
}

/// =============================
/// History Endpoint
/// =============================

async fn conversations_handler(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, (StatusCode, Json<serde_json::Value>)> {
    let records = state
        .service
        .history(&user_id, 50)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(records.into_iter().map(HistoryEntry::from).collect()))
}

/// =============================
/// Analytics Endpoint
/// =============================

async fn analytics_handler(
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let stats = state
        .service
        .analytics()
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(serde_json::json!({
        "total_conversations": stats.total_count,
        "average_sentiment": stats.average_sentiment,
        "conversations_today": stats.count_today,
        "status": "active"
    })))
}

/// =============================
/// WebSocket Channel
/// =============================

async fn ws_handler(
    State(state): State<ApiState>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| ws_channel(socket, state.service))
}

/// Bidirectional channel: each inbound text frame carries the exchange
/// request shape; the reply frame carries the exchange result (or an
/// error payload). Failures answer on the socket without closing it.
async fn ws_channel(mut socket: WebSocket, service: Arc<ConversationService>) {
    while let Some(Ok(frame)) = socket.recv().await {
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // Ping/pong handled by the protocol layer; binary ignored.
            _ => continue,
        };

        let reply = handle_ws_event(&service, &text).await;
        if socket.send(Message::Text(reply)).await.is_err() {
            break;
        }
    }
}

async fn handle_ws_event(service: &ConversationService, text: &str) -> String {
    let req: ChatRequest = match serde_json::from_str(text) {
        Ok(req) => req,
        Err(_) => return r#"{"error":"Invalid event payload"}"#.to_string(),
    };

    let message = req.message.unwrap_or_default();
    let user_id = req.user_id.unwrap_or_else(|| "anonymous".to_string());
    let session_id = req.session_id.unwrap_or_else(|| "default".to_string());

    match service.handle_message(&message, &user_id, &session_id).await {
        Ok(result) => serde_json::to_string(&result)
            .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string()),
        Err(e) if e.is_client_error() => {
            serde_json::json!({ "error": e.to_string() }).to_string()
        }
        Err(e) => {
            error!("Socket exchange failed: {}", e);
            r#"{"error":"Internal server error"}"#.to_string()
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(service: Arc<ConversationService>) -> Router {
    let state = ApiState { service };

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat_handler))
        .route("/api/conversations/:user_id", get(conversations_handler))
        .route("/api/analytics", get(analytics_handler))
        .route("/ws", get(ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    service: Arc<ConversationService>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Chatbot server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
