//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `bugrocket-core` (pure Rust).
//! Implementations live in `bugrocket-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use bugrocket_types::{Result, message::Message, persona::Persona};

// ─── LLM Port ────────────────────────────────────────────────

/// Streaming event from a completion
#[derive(Debug, Clone, PartialEq)]
pub enum LlmStreamEvent {
    /// A fragment of reply text, in arrival order
    Delta(String),
    /// Stream finished; emitted at most once
    Done,
    /// Error during streaming
    Error(String),
}

/// Body sent to the completion endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    #[serde(rename = "mode")]
    pub persona: Persona,
}

pub type LlmStream = Pin<Box<dyn Stream<Item = LlmStreamEvent>>>;

pub trait LlmPort {
    /// Start a completion. Dropping the stream abandons the request.
    fn stream_chat(&self, req: CompletionRequest) -> LlmStream;
}

// ─── Image Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait ImagePort {
    /// Ask the image endpoint for a URL rendering `prompt`
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
