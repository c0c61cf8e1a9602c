//! Archived session snapshots and their persisted form.
//!
//! The archive is read from browser storage, which the app does not control,
//! so ingress goes through the lenient `StoredEntry` shape and is validated
//! into `ArchiveEntry` one entry at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::code::{MirroredCode, PLAIN_TEXT};
use crate::message::{Attachment, Message, Role};
use crate::persona::Persona;
use crate::{Result, RocketError};

/// Title used when the thread does not open with a user message
pub const FALLBACK_TITLE: &str = "New Mission";
const TITLE_CHARS: usize = 25;

/// Snapshot of one session's active thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "mode")]
    pub persona: Persona,
    pub messages: Vec<Message>,
    pub code: MirroredCode,
}

/// Derive a sidebar title from the first message of a thread.
pub fn derive_title(messages: &[Message]) -> String {
    match messages.first() {
        Some(first) if first.is_user() => {
            let head: String = first.content.chars().take(TITLE_CHARS).collect();
            format!("{head}...")
        }
        _ => FALLBACK_TITLE.to_string(),
    }
}

// ─── Ingress ─────────────────────────────────────────────────

/// An archive entry as found in storage, before validation.
#[derive(Debug, Deserialize)]
pub struct StoredEntry {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
    #[serde(default)]
    pub code: Option<StoredCode>,
}

#[derive(Debug, Deserialize)]
pub struct StoredMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default, alias = "experimental_attachments")]
    pub attachments: Vec<StoredAttachment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAttachment {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "contentType")]
    pub media_type: String,
    #[serde(default, alias = "url")]
    pub data_uri: String,
}

/// Older builds persisted only the code text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredCode {
    Mirrored(MirroredCode),
    Legacy(String),
}

impl StoredEntry {
    /// Validate into an `ArchiveEntry`.
    ///
    /// Messages with roles outside user/assistant or non-text content are
    /// dropped, as are attachments that are not data URIs. An entry without
    /// an id is rejected. An unreadable date falls back to `today`.
    pub fn validate(self, today: NaiveDate) -> Result<ArchiveEntry> {
        let id = match self.id {
            Value::String(s) if !s.trim().is_empty() => s,
            Value::Number(n) => n.to_string(),
            _ => return Err(RocketError::InvalidArchive("entry without id".to_string())),
        };

        let persona = match self.mode.as_deref() {
            None | Some("chat") => Persona::Chat,
            Some("debug") => Persona::Debug,
            Some(other) => {
                return Err(RocketError::InvalidArchive(format!(
                    "entry {id}: unknown mode {other:?}"
                )))
            }
        };

        let messages: Vec<Message> = self
            .messages
            .into_iter()
            .filter_map(StoredMessage::validate)
            .collect();

        let title = match self.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => derive_title(&messages),
        };

        let date = self
            .date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(today);

        let code = match self.code {
            Some(StoredCode::Mirrored(code)) => code,
            Some(StoredCode::Legacy(content)) => MirroredCode::new(PLAIN_TEXT, content),
            None => MirroredCode::initial(),
        };

        Ok(ArchiveEntry { id, title, date, persona, messages, code })
    }
}

impl StoredMessage {
    fn validate(self) -> Option<Message> {
        let role = Role::parse(&self.role)?;
        let content = match self.content {
            Value::String(s) => s,
            Value::Null => String::new(),
            _ => return None,
        };
        let attachments = self
            .attachments
            .into_iter()
            .filter(|a| a.data_uri.starts_with("data:"))
            .map(|a| Attachment::new(a.name, a.media_type, a.data_uri))
            .collect();
        Some(Message { role, content, attachments })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
