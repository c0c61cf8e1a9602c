//! One persona's conversation: its messages, in-flight reply and code mirror.

use bugrocket_types::{
    Result, RocketError,
    code::MirroredCode,
    message::Message,
    persona::Persona,
};
use crate::scanner::last_fenced_block;

/// Handed out when a turn starts. Fragments and completion are only applied
/// while the thread is still on the same generation.
#[derive(Debug, Clone)]
pub struct TurnTicket {
    pub persona: Persona,
    pub generation: u64,
    /// Thread history including the new user message
    pub messages: Vec<Message>,
}

/// What happened when a reply finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The thread was reset or replaced while the reply streamed
    Stale,
    Completed {
        text: String,
        /// Language of the newly mirrored block, if the reply had one
        mirrored: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ConversationThread {
    persona: Persona,
    messages: Vec<Message>,
    mirror: MirroredCode,
    streaming: String,
    busy: bool,
    generation: u64,
}

impl ConversationThread {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            messages: Vec::new(),
            mirror: MirroredCode::initial(),
            streaming: String::new(),
            busy: false,
            generation: 0,
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Latest code extracted from this thread's replies
    pub fn mirror(&self) -> &MirroredCode {
        &self.mirror
    }

    /// Reply text received so far for the in-flight turn
    pub fn streaming_text(&self) -> &str {
        &self.streaming
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Append the user's message and mark the thread busy.
    pub fn begin_turn(&mut self, message: Message) -> Result<TurnTicket> {
        if self.busy {
            return Err(RocketError::Busy(self.persona));
        }
        self.messages.push(message);
        self.busy = true;
        self.streaming.clear();
        Ok(TurnTicket {
            persona: self.persona,
            generation: self.generation,
            messages: self.messages.clone(),
        })
    }

    /// Returns false when the ticket no longer belongs to this thread.
    pub fn append_fragment(&mut self, ticket: &TurnTicket, fragment: &str) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        self.streaming.push_str(fragment);
        true
    }

    /// Commit the streamed reply and scan it for code.
    ///
    /// A reply without a fenced block leaves the mirror as it was.
    pub fn complete_turn(&mut self, ticket: &TurnTicket) -> TurnOutcome {
        if !self.owns(ticket) {
            return TurnOutcome::Stale;
        }
        let text = std::mem::take(&mut self.streaming);
        self.busy = false;
        self.messages.push(Message::assistant(text.clone()));

        let mirrored = last_fenced_block(&text).map(|block| {
            let language = block.language.clone();
            self.mirror = block.into();
            language
        });
        TurnOutcome::Completed { text, mirrored }
    }

    /// Release the busy flag after a failed reply. The partial text is discarded.
    pub fn fail_turn(&mut self, ticket: &TurnTicket) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        self.streaming.clear();
        self.busy = false;
        true
    }

    /// Empty the thread and invalidate any in-flight reply.
    pub fn reset(&mut self, mirror: MirroredCode) {
        self.replace(Vec::new(), mirror);
    }

    /// Swap in restored history and invalidate any in-flight reply.
    pub fn replace(&mut self, messages: Vec<Message>, mirror: MirroredCode) {
        self.messages = messages;
        self.mirror = mirror;
        self.streaming.clear();
        self.busy = false;
        self.generation += 1;
    }

    fn owns(&self, ticket: &TurnTicket) -> bool {
        ticket.persona == self.persona && ticket.generation == self.generation && self.busy
    }
}
