use serde::{Deserialize, Serialize};
use crate::persona::Persona;

/// Events emitted by the assistant runtime.
/// UI subscribes to these for status and notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A reply started streaming into a persona's thread
    TurnStart { persona: Persona },

    /// The reply completed and was appended to the thread. Fragments are
    /// read from the thread itself while streaming.
    Complete { persona: Persona, chars: usize },

    /// A fenced block was extracted from the completed reply
    CodeMirrored { persona: Persona, language: String },

    /// The persona's thread is idle again
    TurnEnd { persona: Persona },

    /// The reply failed
    Error { persona: Persona, message: String },

    /// Archive could not be persisted; in-memory state is still intact
    ArchiveWarning { message: String },

    /// An image URL was generated
    ImageReady { prompt: String, url: String },

    /// Image generation failed
    ImageFailed { message: String },
}
