use serde::{Deserialize, Serialize};

/// The two assistant personas. Each owns an independent conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// General-purpose builder
    #[default]
    Chat,
    /// Strict code auditor
    Debug,
}

impl Persona {
    pub fn all() -> &'static [Persona] {
        &[Persona::Chat, Persona::Debug]
    }

    /// Wire name used in requests and the persisted archive
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Chat => "chat",
            Persona::Debug => "debug",
        }
    }

    /// Resolve a request `mode`. Anything other than `"debug"` selects chat.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("debug") => Persona::Debug,
            _ => Persona::Chat,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::Chat => "Chat",
            Persona::Debug => "Debug",
        }
    }

    pub fn other(&self) -> Persona {
        match self {
            Persona::Chat => Persona::Debug,
            Persona::Debug => Persona::Chat,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::Chat => CHAT_SYSTEM_PROMPT,
            Persona::Debug => DEBUG_SYSTEM_PROMPT,
        }
    }

    /// Shown in an empty thread
    pub fn welcome(&self) -> &'static str {
        match self {
            Persona::Chat => "How can I help you code?",
            Persona::Debug => "Paste error logs or broken code.",
        }
    }

    pub fn input_hint(&self) -> &'static str {
        match self {
            Persona::Chat => "Ask BugRocket anything...",
            Persona::Debug => "Paste broken code or error logs...",
        }
    }

    /// One-click prompts. Only the auditor offers them.
    pub fn quick_actions(&self) -> &'static [&'static str] {
        match self {
            Persona::Chat => &[],
            Persona::Debug => &["Find Bugs", "Optimize Code", "Add Comments", "Explain Logic"],
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const CHAT_SYSTEM_PROMPT: &str = r#"You are BugRocket, an elite Senior Software Engineer.
- Your goal is to write clean, modern, efficient code.
- Be concise. Do not waste time with small talk.
- If writing React, prefer functional components and Hooks."#;

const DEBUG_SYSTEM_PROMPT: &str = r#"You are a Strict Code Auditor.
- Your ONLY goal is to find bugs, logic errors, and security risks.
- Analyze the user's code or error logs.
- Provide the FIXED code block immediately after the explanation."#;
