//! BugRocket HTTP service.
//!
//! Two endpoints back the browser client: `/api/chat` proxies a streaming
//! completion under a persona's system prompt, `/api/image` hands out a
//! keyless image URL.

pub mod config;
pub mod error;
pub mod image;
pub mod routes;
pub mod sse;
pub mod upstream;

pub use routes::{router, AppState};
