use serde::{Deserialize, Serialize};

/// Language marker used when a fence carries no tag
pub const PLAIN_TEXT: &str = "text";

const INITIAL_LANGUAGE: &str = "typescript";
const INITIAL_CONTENT: &str = "// Waiting for code...";
const READY_CONTENT: &str = "// Ready...";

/// The code currently shown in the read-only viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirroredCode {
    pub language: String,
    pub content: String,
}

impl MirroredCode {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            content: content.into(),
        }
    }

    /// Shown before anything has been extracted in this tab
    pub fn initial() -> Self {
        Self::new(INITIAL_LANGUAGE, INITIAL_CONTENT)
    }

    /// Shown after the user starts a new session
    pub fn ready() -> Self {
        Self::new(INITIAL_LANGUAGE, READY_CONTENT)
    }

    pub fn is_placeholder(&self) -> bool {
        self.content == INITIAL_CONTENT || self.content == READY_CONTENT
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

impl Default for MirroredCode {
    fn default() -> Self {
        Self::initial()
    }
}
