//! Completion adapter for the BugRocket `/api/chat` endpoint.
//!
//! POSTs `{messages, mode}` and reads the plain-text reply body chunk by
//! chunk through the browser `ReadableStream` reader, so fragments reach the
//! UI while the model is still generating.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use futures::stream;
use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use bugrocket_core::fragments::Utf8Fragments;
use bugrocket_core::ports::*;
use bugrocket_types::{Result, RocketError};

pub struct HttpCompletionClient {
    url: String,
}

impl HttpCompletionClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl LlmPort for HttpCompletionClient {
    fn stream_chat(&self, req: CompletionRequest) -> LlmStream {
        let start = ReadState::Start {
            url: self.url.clone(),
            request: req,
        };
        Box::pin(stream::unfold(start, next_event))
    }
}

// ─── Stream state machine ────────────────────────────────────

enum ReadState {
    Start {
        url: String,
        request: CompletionRequest,
    },
    Reading {
        reader: ReadableStreamDefaultReader,
        fragments: Utf8Fragments,
    },
    Finished,
}

async fn next_event(state: ReadState) -> Option<(LlmStreamEvent, ReadState)> {
    let (reader, mut fragments) = match state {
        ReadState::Start { url, request } => match open_reader(&url, &request).await {
            Ok(reader) => (reader, Utf8Fragments::new()),
            Err(e) => return Some((LlmStreamEvent::Error(e.to_string()), ReadState::Finished)),
        },
        ReadState::Reading { reader, fragments } => (reader, fragments),
        ReadState::Finished => return None,
    };

    loop {
        match read_chunk(&reader).await {
            Ok(Some(bytes)) => {
                let text = fragments.push(&bytes);
                if !text.is_empty() {
                    return Some((
                        LlmStreamEvent::Delta(text),
                        ReadState::Reading { reader, fragments },
                    ));
                }
            }
            Ok(None) if fragments.has_pending() => {
                let tail = fragments.finish();
                return Some((
                    LlmStreamEvent::Delta(tail),
                    ReadState::Reading { reader, fragments },
                ));
            }
            Ok(None) => return Some((LlmStreamEvent::Done, ReadState::Finished)),
            Err(e) => {
                log::error!("Reply stream broke: {}", e);
                return Some((LlmStreamEvent::Error(e.to_string()), ReadState::Finished));
            }
        }
    }
}

async fn open_reader(url: &str, request: &CompletionRequest) -> Result<ReadableStreamDefaultReader> {
    log::debug!("POST {} ({} messages, {})", url, request.messages.len(), request.persona);

    let response = Request::post(url)
        .json(request)
        .map_err(|e| RocketError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| RocketError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(RocketError::Llm(format!("HTTP {}: {}", status, text)));
    }

    let body = response
        .body()
        .ok_or_else(|| RocketError::Llm("Response has no body".to_string()))?;
    body.get_reader()
        .dyn_into::<ReadableStreamDefaultReader>()
        .map_err(|e| RocketError::JsInterop(format!("{:?}", e)))
}

/// One `reader.read()`. `None` once the body is exhausted.
async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read())
        .await
        .map_err(|e| RocketError::Network(format!("{:?}", e)))?;

    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(|e| RocketError::JsInterop(format!("{:?}", e)))?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }

    let value = Reflect::get(&result, &JsValue::from_str("value"))
        .map_err(|e| RocketError::JsInterop(format!("{:?}", e)))?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}
