//! Server-sent events decoding for the upstream completion stream.

use bugrocket_core::fragments::Utf8Fragments;

/// Incremental SSE parser. Feed raw body chunks, get back the `data`
/// payload of every event completed so far.
#[derive(Debug, Default)]
pub struct SseDecoder {
    text: Utf8Fragments,
    line: String,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let text = self.text.push(bytes);
        self.consume(&text)
    }

    /// Flush at end of body; a final event without its blank line still counts.
    pub fn finish(&mut self) -> Vec<String> {
        let tail = self.text.finish();
        let mut events = self.consume(&tail);
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.field(&line);
        }
        if let Some(event) = self.dispatch() {
            events.push(event);
        }
        events
    }

    fn consume(&mut self, text: &str) -> Vec<String> {
        let mut events = Vec::new();
        for ch in text.chars() {
            if ch != '\n' {
                self.line.push(ch);
                continue;
            }
            let line = std::mem::take(&mut self.line);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.is_empty() {
                if let Some(event) = self.dispatch() {
                    events.push(event);
                }
            } else {
                self.field(line);
            }
        }
        events
    }

    fn field(&mut self, line: &str) {
        // Comments start with a colon
        if line.starts_with(':') {
            return;
        }
        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        if name == "data" {
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data.push(value.to_string());
        }
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data).join("\n"))
    }
}
