use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures::stream;
use tower::ServiceExt;

use bugrocket_server::error::ServerError;
use bugrocket_server::upstream::{CompletionProvider, TextStream};
use bugrocket_server::{router, AppState};
use bugrocket_types::message::Message;
use bugrocket_types::persona::Persona;

enum Script {
    Reply(Vec<&'static str>),
    /// Yields one fragment, then never finishes
    Stall,
    RejectUpfront,
    FailMidway,
}

struct FakeProvider {
    script: Script,
    calls: AtomicUsize,
    systems: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            systems: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_system(&self) -> Option<String> {
        self.systems.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn stream_completion(
        &self,
        system: &str,
        _messages: &[Message],
    ) -> Result<TextStream, ServerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.systems.lock().unwrap().push(system.to_string());
        match &self.script {
            Script::Reply(parts) => {
                let items: Vec<Result<String, ServerError>> =
                    parts.iter().map(|p| Ok(p.to_string())).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            Script::Stall => {
                let first = stream::iter(vec![Ok::<_, ServerError>("partial".to_string())]);
                Ok(Box::pin(futures::StreamExt::chain(first, stream::pending())))
            }
            Script::RejectUpfront => Err(ServerError::Upstream("HTTP 401: bad key".to_string())),
            Script::FailMidway => Ok(Box::pin(stream::iter(vec![
                Ok("half".to_string()),
                Err(ServerError::Upstream("connection reset".to_string())),
            ]))),
        }
    }
}

fn app(provider: Arc<FakeProvider>, max_duration: Duration) -> Router {
    router(AppState {
        provider,
        max_duration,
        image_base: "https://image.pollinations.ai/prompt".to_string(),
    })
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const HELLO: &str = r#"{"messages":[{"role":"user","content":"hi"}],"mode":"chat"}"#;

// ─── /api/chat ───────────────────────────────────────────────

#[tokio::test]
async fn chat_streams_reply_as_plain_text() {
    let provider = FakeProvider::new(Script::Reply(vec!["Hello", ", ", "world"]));
    let response = app(provider.clone(), Duration::from_secs(30))
        .oneshot(post_json("/api/chat", HELLO))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Hello, world");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn chat_mode_selects_system_prompt() {
    let provider = FakeProvider::new(Script::Reply(vec!["ok"]));
    let router = app(provider.clone(), Duration::from_secs(30));

    let debug = r#"{"messages":[{"role":"user","content":"x"}],"mode":"debug"}"#;
    router.clone().oneshot(post_json("/api/chat", debug)).await.unwrap();
    assert_eq!(provider.last_system().as_deref(), Some(Persona::Debug.system_prompt()));

    let unknown = r#"{"messages":[{"role":"user","content":"x"}],"mode":"pirate"}"#;
    router.clone().oneshot(post_json("/api/chat", unknown)).await.unwrap();
    assert_eq!(provider.last_system().as_deref(), Some(Persona::Chat.system_prompt()));

    let absent = r#"{"messages":[{"role":"user","content":"x"}]}"#;
    router.oneshot(post_json("/api/chat", absent)).await.unwrap();
    assert_eq!(provider.last_system().as_deref(), Some(Persona::Chat.system_prompt()));
}

#[tokio::test]
async fn chat_without_messages_is_rejected() {
    let provider = FakeProvider::new(Script::Reply(vec!["unused"]));
    let router = app(provider.clone(), Duration::from_secs(30));

    for body in [r#"{"mode":"chat"}"#, r#"{"messages":[],"mode":"debug"}"#] {
        let response = router.clone().oneshot(post_json("/api/chat", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn chat_upstream_rejection_is_generic_500() {
    let provider = FakeProvider::new(Script::RejectUpfront);
    let response = app(provider, Duration::from_secs(30))
        .oneshot(post_json("/api/chat", HELLO))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Internal Error");
}

#[tokio::test]
async fn chat_stream_failure_aborts_body() {
    let provider = FakeProvider::new(Script::FailMidway);
    let response = app(provider, Duration::from_secs(30))
        .oneshot(post_json("/api/chat", HELLO))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
}

#[tokio::test]
async fn chat_past_deadline_aborts_body() {
    let provider = FakeProvider::new(Script::Stall);
    let response = app(provider, Duration::from_millis(50))
        .oneshot(post_json("/api/chat", HELLO))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let collected = tokio::time::timeout(
        Duration::from_secs(5),
        to_bytes(response.into_body(), usize::MAX),
    )
    .await
    .expect("body should end at the deadline");
    assert!(collected.is_err());
}

// ─── /api/image ──────────────────────────────────────────────

#[tokio::test]
async fn image_returns_pollinations_url() {
    let provider = FakeProvider::new(Script::Reply(vec![]));
    let response = app(provider.clone(), Duration::from_secs(30))
        .oneshot(post_json("/api/image", r#"{"prompt":"a red fox"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let url = json["imageUrl"].as_str().unwrap();

    let prefix = "https://image.pollinations.ai/prompt/a%20red%20fox?width=1024&height=1024&seed=";
    assert!(url.starts_with(prefix), "unexpected url {}", url);
    let rest = &url[prefix.len()..];
    let (seed, tail) = rest.split_once('&').unwrap();
    assert!(seed.parse::<u32>().unwrap() < 1_000_000);
    assert_eq!(tail, "nologo=true");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn image_requires_prompt() {
    let provider = FakeProvider::new(Script::Reply(vec![]));
    let router = app(provider.clone(), Duration::from_secs(30));

    for body in [r#"{}"#, r#"{"prompt":""}"#, r#"{"prompt":null}"#, r#"{"prompt":0}"#] {
        let response = router.clone().oneshot(post_json("/api/image", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&text[..], b"Prompt is required");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn image_malformed_body_is_internal_error() {
    let provider = FakeProvider::new(Script::Reply(vec![]));
    let response = app(provider, Duration::from_secs(30))
        .oneshot(post_json("/api/image", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Internal Error");
}
