//! The live session: two persona threads and which one is active.

use chrono::NaiveDate;
use bugrocket_types::{
    archive::{ArchiveEntry, derive_title},
    code::MirroredCode,
    persona::Persona,
};
use crate::thread::ConversationThread;

pub struct Session {
    id: String,
    active: Persona,
    chat: ConversationThread,
    debug: ConversationThread,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: Persona::Chat,
            chat: ConversationThread::new(Persona::Chat),
            debug: ConversationThread::new(Persona::Debug),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn active_persona(&self) -> Persona {
        self.active
    }

    pub fn thread(&self, persona: Persona) -> &ConversationThread {
        match persona {
            Persona::Chat => &self.chat,
            Persona::Debug => &self.debug,
        }
    }

    pub fn thread_mut(&mut self, persona: Persona) -> &mut ConversationThread {
        match persona {
            Persona::Chat => &mut self.chat,
            Persona::Debug => &mut self.debug,
        }
    }

    pub fn active_thread(&self) -> &ConversationThread {
        self.thread(self.active)
    }

    /// Code shown in the viewer. Always the active thread's own mirror.
    pub fn mirror(&self) -> &MirroredCode {
        self.active_thread().mirror()
    }

    /// Returns true if the active persona changed. Messages stay where they are.
    pub fn switch_persona(&mut self, persona: Persona) -> bool {
        if self.active == persona {
            return false;
        }
        self.active = persona;
        true
    }

    /// Fresh id, both threads emptied, mirror back to the placeholder.
    pub fn start_new(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.active = Persona::Chat;
        self.chat.reset(MirroredCode::ready());
        self.debug.reset(MirroredCode::ready());
    }

    /// Restore an archived conversation into the thread of its persona.
    ///
    /// The other thread is emptied: the entry never recorded it.
    pub fn load_entry(&mut self, entry: &ArchiveEntry) {
        self.id = entry.id.clone();
        self.active = entry.persona;
        self.thread_mut(entry.persona)
            .replace(entry.messages.clone(), entry.code.clone());
        self.thread_mut(entry.persona.other())
            .reset(MirroredCode::ready());
    }

    /// Archive view of the active thread, or `None` while it is empty.
    pub fn snapshot(&self, today: NaiveDate) -> Option<ArchiveEntry> {
        let thread = self.active_thread();
        if thread.is_empty() {
            return None;
        }
        Some(ArchiveEntry {
            id: self.id.clone(),
            title: derive_title(thread.messages()),
            date: today,
            persona: self.active,
            messages: thread.messages().to_vec(),
            code: thread.mirror().clone(),
        })
    }
}

/// Hands out time-based session ids that never repeat within a tab.
#[derive(Debug, Default)]
pub struct SessionIds {
    last: i64,
}

impl SessionIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, now_millis: i64) -> String {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id.to_string()
    }
}
