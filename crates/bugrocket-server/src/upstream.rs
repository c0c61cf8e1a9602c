//! Upstream completion providers.
//!
//! `GeminiClient` talks to the Generative Language API's
//! `streamGenerateContent` endpoint in SSE mode and turns the event stream
//! into plain reply text.

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use serde_json::{Value, json};

use bugrocket_types::message::{Message, Role};
use crate::error::ServerError;
use crate::sse::SseDecoder;

/// Reply text in arrival order
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ServerError>> + Send>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Start a completion. Errors before the first byte are returned here,
    /// later ones arrive on the stream.
    async fn stream_completion(
        &self,
        system: &str,
        messages: &[Message],
    ) -> Result<TextStream, ServerError>;
}

// ─── Gemini ──────────────────────────────────────────────────

pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn stream_completion(
        &self,
        system: &str,
        messages: &[Message],
    ) -> Result<TextStream, ServerError> {
        let body = build_request(system, messages);
        tracing::debug!(model = %self.model, messages = messages.len(), "upstream request");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServerError::Upstream(format!("HTTP {}: {}", status, text)));
        }

        Ok(sse_text_stream(response.bytes_stream()))
    }
}

/// Request body for `streamGenerateContent`
pub fn build_request(system: &str, messages: &[Message]) -> Value {
    let contents: Vec<Value> = messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            let mut parts: Vec<Value> = Vec::new();
            if !m.content.is_empty() {
                parts.push(json!({ "text": m.content }));
            }
            for attachment in &m.attachments {
                match attachment.inline_data() {
                    Some((mime, data)) => parts.push(json!({
                        "inlineData": { "mimeType": mime, "data": data }
                    })),
                    None => tracing::warn!(name = %attachment.name, "attachment is not inline base64, skipped"),
                }
            }
            if parts.is_empty() {
                parts.push(json!({ "text": "" }));
            }
            json!({ "role": role, "parts": parts })
        })
        .collect();

    json!({
        "systemInstruction": { "parts": [{ "text": system }] },
        "contents": contents,
    })
}

// ─── Response decoding ───────────────────────────────────────

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ChunkError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChunkError {
    message: String,
}

/// Text carried by one SSE `data` payload, if any.
pub fn chunk_text(data: &str) -> Result<Option<String>, ServerError> {
    let chunk: StreamChunk = serde_json::from_str(data)
        .map_err(|e| ServerError::Upstream(format!("bad stream chunk: {}", e)))?;
    if let Some(error) = chunk.error {
        return Err(ServerError::Upstream(error.message));
    }
    let text: String = chunk
        .candidates
        .into_iter()
        .take(1)
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();
    Ok(if text.is_empty() { None } else { Some(text) })
}

struct SseState<S> {
    bytes: S,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    /// Reported once the text decoded before it has been yielded
    failure: Option<ServerError>,
    finished: bool,
}

impl<S> SseState<S> {
    /// Queue the text of decoded events, stopping at the first bad one.
    fn absorb(&mut self, events: Vec<String>) {
        for data in events {
            match chunk_text(&data) {
                Ok(Some(text)) => self.pending.push_back(text),
                Ok(None) => {}
                Err(e) => {
                    self.fail(e);
                    return;
                }
            }
        }
    }

    fn fail(&mut self, error: ServerError) {
        self.failure = Some(error);
        self.finished = true;
    }
}

/// Turn an SSE body into reply text fragments.
pub fn sse_text_stream<S>(bytes: S) -> TextStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let state = SseState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        failure: None,
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(text) = st.pending.pop_front() {
                return Some((Ok(text), st));
            }
            if let Some(error) = st.failure.take() {
                return Some((Err(error), st));
            }
            if st.finished {
                return None;
            }
            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = st.decoder.push(&chunk);
                    st.absorb(events);
                }
                Some(Err(e)) => st.fail(ServerError::from(e)),
                None => {
                    st.finished = true;
                    let events = st.decoder.finish();
                    st.absorb(events);
                }
            }
        }
    }))
}
