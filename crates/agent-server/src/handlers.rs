//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, Role, SessionId, Source, Turn};
use crypto_router::{
    IgnoreReason, Intent, Reliability, SUGGESTED_QUERIES, SourceExt, SourceKind, SubmitOutcome,
    Ticker,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend: String,
    pub backend_connected: bool,
    pub conversations: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub intent: Intent,
    pub detected: Option<Ticker>,
    pub current_asset: Option<Ticker>,
    pub reply: TurnView,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub current_asset: Option<Ticker>,
    pub busy: bool,
    pub turns: Vec<TurnView>,
    /// Starter prompts, only while the user has not said anything yet
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TurnView {
    pub role: Role,
    pub text: String,
    pub sentiment_score: Option<f64>,
    pub sources: Vec<SourceView>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SourceView {
    pub name: String,
    pub url: Option<String>,
    pub kind: SourceKind,
    pub reliability: Reliability,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

impl From<&Source> for SourceView {
    fn from(source: &Source) -> Self {
        Self {
            name: source.name.clone(),
            url: source.url.clone(),
            kind: source.kind(),
            reliability: source.reliability(),
        }
    }
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            text: turn.text.clone(),
            sentiment_score: turn.sentiment_score,
            sources: turn.sources.iter().map(SourceView::from).collect(),
            timestamp: turn.timestamp,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_connected = state.backend.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.backend.name().to_string(),
        backend_connected,
        conversations: state.sessions.len().await,
    })
}

/// Starter prompts for an empty conversation
pub async fn suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: SUGGESTED_QUERIES.to_vec(),
    })
}

/// Submit one user message
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            AgentError::EmptyInput.user_message(),
            "EMPTY_MESSAGE",
        ));
    }

    let id = payload
        .conversation_id
        .map_or_else(SessionId::new, SessionId::from_string);
    let session = state.session(id.clone()).await;

    match session.submit(&payload.message).await {
        SubmitOutcome::Answered(report) => Ok(Json(ChatResponse {
            conversation_id: id.to_string(),
            intent: report.intent,
            detected: report.detected,
            current_asset: session.current_asset().await,
            reply: TurnView::from(&report.reply),
        })),
        SubmitOutcome::Ignored(IgnoreReason::Busy) => {
            tracing::debug!(conversation = %id, "Rejected submission while turn in flight");
            Err(api_error(
                StatusCode::CONFLICT,
                AgentError::Busy.user_message(),
                "TURN_IN_FLIGHT",
            ))
        }
        SubmitOutcome::Ignored(IgnoreReason::Empty) => Err(api_error(
            StatusCode::BAD_REQUEST,
            AgentError::EmptyInput.user_message(),
            "EMPTY_MESSAGE",
        )),
        SubmitOutcome::Ignored(IgnoreReason::Cancelled) => Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Server is shutting down",
            "SHUTTING_DOWN",
        )),
    }
}

/// Full transcript of a conversation
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let id = SessionId::from_string(id);
    let session = state.sessions.get(&id).await.ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "Conversation not found",
            "CONVERSATION_NOT_FOUND",
        )
    })?;

    let snapshot = session.snapshot().await;
    let fresh = !snapshot.turns.iter().any(Turn::is_user);

    Ok(Json(ConversationResponse {
        conversation_id: id.to_string(),
        current_asset: snapshot.current_asset,
        busy: snapshot.busy,
        turns: snapshot.turns.iter().map(TurnView::from).collect(),
        suggestions: if fresh { SUGGESTED_QUERIES.to_vec() } else { Vec::new() },
    }))
}

/// Forget a conversation
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = SessionId::from_string(id);
    let session = state.sessions.get(&id).await.ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "Conversation not found",
            "CONVERSATION_NOT_FOUND",
        )
    })?;

    if session.is_busy() {
        return Err(api_error(
            StatusCode::CONFLICT,
            AgentError::Busy.user_message(),
            "TURN_IN_FLIGHT",
        ));
    }

    state.sessions.remove(&id).await;
    tracing::info!(conversation = %id, "Conversation removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        Router,
        body::Body,
        http::{Request, Response},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use agent_core::{BackendResponse, Capability};
    use crypto_router::{
        DispatchConfig,
        backend::{MockBackend, MockReply},
    };

    use super::*;
    use crate::build_router;

    fn app_with(backend: MockBackend) -> Router {
        build_router(AppState::new(Arc::new(backend), DispatchConfig::default()))
    }

    fn post_chat(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_tracks_asset_across_turns() {
        let app = app_with(MockBackend::new());

        let resp = app
            .clone()
            .oneshot(post_chat(&json!({"message": "Analyze BTC", "conversation_id": "c1"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["intent"], "DIRECT_ANALYSIS");
        assert_eq!(body["current_asset"], "BTC");
        assert_eq!(body["reply"]["role"], "assistant");

        let resp = app
            .oneshot(post_chat(&json!({
                "message": "what about its sentiment?",
                "conversation_id": "c1"
            })))
            .await
            .unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["intent"], "FOLLOWUP");
        assert_eq!(body["detected"], Value::Null);
        assert_eq!(body["current_asset"], "BTC");
    }

    #[tokio::test]
    async fn test_chat_assigns_conversation_id() {
        let app = app_with(MockBackend::new());

        let resp = app
            .oneshot(post_chat(&json!({"message": "What is blockchain?"})))
            .await
            .unwrap();
        let body = json_body(resp).await;
        assert!(!body["conversation_id"].as_str().unwrap().is_empty());
        assert_eq!(body["current_asset"], Value::Null);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let app = app_with(MockBackend::new());

        let resp = app
            .oneshot(post_chat(&json!({"message": "  "})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["code"], "EMPTY_MESSAGE");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_404() {
        let app = app_with(MockBackend::new());

        let resp = app.oneshot(get("/api/conversations/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transcript_labels_sources() {
        let app = app_with(MockBackend::new());

        app.clone()
            .oneshot(post_chat(&json!({"message": "ETH", "conversation_id": "c2"})))
            .await
            .unwrap();

        let resp = app.oneshot(get("/api/conversations/c2")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;

        let turns = body["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1]["text"], "ETH");
        let sources = turns[2]["sources"].as_array().unwrap();
        assert_eq!(sources[0]["name"], "CoinDesk");
        assert_eq!(sources[0]["reliability"], "high");
        assert_eq!(sources[1]["kind"], "on_chain_data");
        assert!(body["suggestions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_submission_while_busy_conflicts() {
        let slow = MockReply::Delayed(Duration::from_millis(300), BackendResponse::text("done"));
        let app = app_with(MockBackend::new().with_reply(Capability::Followup, slow));

        let first = tokio::spawn(
            app.clone()
                .oneshot(post_chat(&json!({
                    "message": "tell me about SOL",
                    "conversation_id": "c3"
                }))),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;

        let resp = app
            .clone()
            .oneshot(post_chat(&json!({"message": "and ADA?", "conversation_id": "c3"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(resp).await["code"], "TURN_IN_FLIGHT");

        let resp = first.await.unwrap().unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["current_asset"], "SOL");

        let body = json_body(app.oneshot(get("/api/conversations/c3")).await.unwrap()).await;
        assert_eq!(body["turns"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_suggestions_and_health() {
        let app = app_with(MockBackend::new());

        let body = json_body(app.clone().oneshot(get("/api/suggestions")).await.unwrap()).await;
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);

        let body = json_body(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "MockBackend");
        assert_eq!(body["backend_connected"], true);
    }

    #[tokio::test]
    async fn test_delete_conversation() {
        let app = app_with(MockBackend::new());

        app.clone()
            .oneshot(post_chat(&json!({"message": "BTC", "conversation_id": "c4"})))
            .await
            .unwrap();

        let delete = |uri: &str| {
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let resp = app.clone().oneshot(delete("/api/conversations/c4")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app.clone().oneshot(get("/api/conversations/c4")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app.oneshot(delete("/api/conversations/c4")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
