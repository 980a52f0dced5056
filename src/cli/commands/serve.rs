//! HTTP API server.
//!
//! Every request runs its own agent session; all sessions share one tool
//! registry and therefore one search rate limiter.

use crate::agent::{AgentResponse, ToolCallRecord};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::SongVocabError;
use crate::orchestrator::{Orchestrator, RunOptions};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/agent", post(agent))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("song-vocab API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Agent", "POST /api/agent");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AgentRequest {
    message_request: String,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Serialize)]
struct AgentReply {
    content: String,
    turns: usize,
    iterations: usize,
    tool_calls: Vec<ToolCallRecord>,
}

impl From<AgentResponse> for AgentReply {
    fn from(response: AgentResponse) -> Self {
        Self {
            content: response.content,
            turns: response.turns,
            iterations: response.iterations,
            tool_calls: response.tool_calls,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn agent(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AgentRequest>,
) -> impl IntoResponse {
    let options = RunOptions {
        model: request.model,
        ..RunOptions::default()
    };

    match state
        .orchestrator
        .process_request(&request.message_request, &options)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(AgentReply::from(response))).into_response(),
        Err(e) => {
            let status = match e {
                SongVocabError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => {
                    error!("Agent request failed: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
