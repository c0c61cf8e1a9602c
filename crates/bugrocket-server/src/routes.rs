use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::{StreamExt, stream};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::{Instant, timeout_at};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bugrocket_types::message::Message;
use bugrocket_types::persona::Persona;
use crate::error::ServerError;
use crate::image::{image_url, random_seed};
use crate::upstream::{CompletionProvider, TextStream};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    /// Budget for one completion, request to last byte
    pub max_duration: Duration,
    pub image_base: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/image", post(image))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct ChatRequest {
    messages: Option<Vec<Message>>,
    mode: Option<String>,
}

async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ServerError> {
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::Validation(format!("Invalid request body: {}", e)))?;
    let messages = match request.messages {
        Some(messages) if !messages.is_empty() => messages,
        _ => return Err(ServerError::Validation("Messages are required".to_string())),
    };

    let persona = Persona::from_mode(request.mode.as_deref());
    let deadline = Instant::now() + state.max_duration;
    let secs = state.max_duration.as_secs();
    tracing::info!(persona = %persona, messages = messages.len(), "chat request");

    let upstream = timeout_at(
        deadline,
        state.provider.stream_completion(persona.system_prompt(), &messages),
    )
    .await
    .map_err(|_| ServerError::Timeout(secs))??;

    let body = Body::from_stream(bounded(upstream, deadline, secs));
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}

/// Forward reply text until the stream ends, fails, or the deadline passes.
/// The first failure is yielded once so the body aborts instead of looking
/// complete.
fn bounded(
    upstream: TextStream,
    deadline: Instant,
    secs: u64,
) -> impl futures::Stream<Item = Result<Bytes, ServerError>> + Send {
    stream::unfold(Some(upstream), move |upstream| async move {
        let mut upstream = upstream?;
        match timeout_at(deadline, upstream.next()).await {
            Ok(Some(Ok(text))) => Some((Ok(Bytes::from(text)), Some(upstream))),
            Ok(Some(Err(e))) => {
                tracing::error!(error = %e, "completion stream failed");
                Some((Err(e), None))
            }
            Ok(None) => None,
            Err(_) => {
                tracing::warn!(secs, "completion exceeded its time budget");
                Some((Err(ServerError::Timeout(secs)), None))
            }
        }
    })
}

/// JS truthiness for the `prompt` field
fn prompt_text(prompt: Option<&Value>) -> Option<String> {
    match prompt? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

async fn image(State(state): State<AppState>, body: Bytes) -> Result<Response, ServerError> {
    let request: Value = serde_json::from_slice(&body)
        .map_err(|e| ServerError::Internal(format!("image request body: {}", e)))?;
    if request.is_null() {
        return Err(ServerError::Internal("image request body is null".to_string()));
    }
    let Some(prompt) = prompt_text(request.get("prompt")) else {
        return Err(ServerError::Validation("Prompt is required".to_string()));
    };

    let url = image_url(&state.image_base, &prompt, random_seed());
    tracing::info!(chars = prompt.chars().count(), "image url issued");
    Ok(Json(json!({ "imageUrl": url })).into_response())
}
