//! Assistant runtime: routes submissions, consumes reply streams, keeps the
//! archive in step with the live session.
//!
//! A turn goes:
//! 1. Append the user message to the active persona's thread (busy on)
//! 2. Upsert the session snapshot into the archive
//! 3. Stream the reply, accumulating fragments on the thread
//! 4. On `Done`, commit the reply and scan it for code (busy off)
//! 5. Upsert again if that persona is still the active one
//!
//! All state is single-threaded. `RefCell` borrows are never held across
//! an `.await`, so a second persona can stream while the first one does.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use futures::StreamExt;
use bugrocket_types::{
    Result, RocketError,
    event::SessionEvent,
    message::{Attachment, Message},
    persona::Persona,
};
use crate::archive::Archive;
use crate::clock::Clock;
use crate::event_bus::EventBus;
use crate::ports::*;
use crate::session::{Session, SessionIds};
use crate::thread::{TurnOutcome, TurnTicket};

pub struct AssistantRuntime {
    session: RefCell<Session>,
    ids: RefCell<SessionIds>,
    archive: Archive,
    llm: RefCell<Rc<dyn LlmPort>>,
    images: RefCell<Rc<dyn ImagePort>>,
    clock: Rc<dyn Clock>,
    event_bus: EventBus,
}

impl AssistantRuntime {
    pub fn new(
        archive: Archive,
        llm: Rc<dyn LlmPort>,
        images: Rc<dyn ImagePort>,
        clock: Rc<dyn Clock>,
        event_bus: EventBus,
    ) -> Self {
        let mut ids = SessionIds::new();
        let session = Session::new(ids.next(clock.now_millis()));
        Self {
            session: RefCell::new(session),
            ids: RefCell::new(ids),
            archive,
            llm: RefCell::new(llm),
            images: RefCell::new(images),
            clock,
            event_bus,
        }
    }

    /// Read-only view for rendering. Do not hold across an await.
    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Swap the completion adapter, e.g. after the endpoint changed.
    pub fn set_llm(&self, llm: Rc<dyn LlmPort>) {
        *self.llm.borrow_mut() = llm;
    }

    pub fn set_images(&self, images: Rc<dyn ImagePort>) {
        *self.images.borrow_mut() = images;
    }

    /// Read the persisted archive once at startup. Failure is non-fatal.
    pub async fn load_archive(&self) {
        if let Err(e) = self.archive.load(self.clock.today()).await {
            self.warn_archive("loaded", &e);
        }
    }

    // ─── Session control ─────────────────────────────────────

    /// Make `persona` the live thread. Returns true if it changed; the caller
    /// should then run [`sync_archive`](Self::sync_archive).
    pub fn switch_persona(&self, persona: Persona) -> bool {
        self.session.borrow_mut().switch_persona(persona)
    }

    /// Start over with a fresh id. Earlier archive entries are kept.
    pub fn new_session(&self) {
        let id = self.ids.borrow_mut().next(self.clock.now_millis());
        log::info!("New session {}", id);
        self.session.borrow_mut().start_new(id);
    }

    /// Restore an archived session. Returns false if the id is unknown.
    pub fn load_entry(&self, id: &str) -> bool {
        let Some(entry) = self.archive.get(id) else {
            log::warn!("No archive entry {}", id);
            return false;
        };
        self.session.borrow_mut().load_entry(&entry);
        log::info!("Loaded session {} ({})", entry.id, entry.persona);
        true
    }

    pub async fn delete_entry(&self, id: &str) {
        if let Err(e) = self.archive.remove(id).await {
            self.warn_archive("deleted", &e);
        }
    }

    pub async fn clear_archive(&self) {
        if let Err(e) = self.archive.clear().await {
            self.warn_archive("cleared", &e);
        }
    }

    /// Upsert the active thread's snapshot. Does nothing while it is empty.
    pub async fn sync_archive(&self) {
        let snapshot = self.session.borrow().snapshot(self.clock.today());
        if let Some(entry) = snapshot {
            if let Err(e) = self.archive.upsert(entry).await {
                self.warn_archive("saved", &e);
            }
        }
    }

    // ─── Turns ───────────────────────────────────────────────

    /// Send a user message to the active persona and stream the reply.
    pub async fn submit(&self, text: String, attachments: Vec<Attachment>) -> Result<()> {
        if text.trim().is_empty() && attachments.is_empty() {
            return Err(RocketError::Validation("message is empty".to_string()));
        }

        let ticket = {
            let mut session = self.session.borrow_mut();
            let persona = session.active_persona();
            let message = Message::user(text).with_attachments(attachments);
            session.thread_mut(persona).begin_turn(message)?
        };
        let persona = ticket.persona;

        self.sync_archive().await;
        self.event_bus.emit(SessionEvent::TurnStart { persona });

        let request = CompletionRequest {
            messages: ticket.messages.clone(),
            persona,
        };
        let llm = self.llm.borrow().clone();
        let mut stream = llm.stream_chat(request);

        while let Some(event) = stream.next().await {
            match event {
                LlmStreamEvent::Delta(token) => {
                    let live = self
                        .session
                        .borrow_mut()
                        .thread_mut(persona)
                        .append_fragment(&ticket, &token);
                    if !live {
                        log::info!("{} thread was reset, dropping reply", persona);
                        return Ok(());
                    }
                }
                LlmStreamEvent::Done => return self.finish_turn(&ticket).await,
                LlmStreamEvent::Error(message) => {
                    return Err(self.fail_turn(&ticket, RocketError::Llm(message)));
                }
            }
        }

        Err(self.fail_turn(
            &ticket,
            RocketError::Llm("reply stream ended before completion".to_string()),
        ))
    }

    async fn finish_turn(&self, ticket: &TurnTicket) -> Result<()> {
        let persona = ticket.persona;
        let (outcome, is_active) = {
            let mut session = self.session.borrow_mut();
            let outcome = session.thread_mut(persona).complete_turn(ticket);
            (outcome, session.active_persona() == persona)
        };

        let TurnOutcome::Completed { text, mirrored } = outcome else {
            log::info!("{} thread was reset, dropping reply", persona);
            return Ok(());
        };

        self.event_bus.emit(SessionEvent::Complete {
            persona,
            chars: text.chars().count(),
        });
        if let Some(language) = mirrored {
            log::debug!("Mirrored {} block from {} reply", language, persona);
            self.event_bus.emit(SessionEvent::CodeMirrored { persona, language });
        }
        self.event_bus.emit(SessionEvent::TurnEnd { persona });

        if is_active {
            self.sync_archive().await;
        }
        Ok(())
    }

    fn fail_turn(&self, ticket: &TurnTicket, error: RocketError) -> RocketError {
        let persona = ticket.persona;
        let owned = self
            .session
            .borrow_mut()
            .thread_mut(persona)
            .fail_turn(ticket);
        if owned {
            log::error!("{} reply failed: {}", persona, error);
            self.event_bus.emit(SessionEvent::Error {
                persona,
                message: error.to_string(),
            });
            self.event_bus.emit(SessionEvent::TurnEnd { persona });
        }
        error
    }

    // ─── Images ──────────────────────────────────────────────

    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(RocketError::Validation("prompt is required".to_string()));
        }

        let images = self.images.borrow().clone();
        match images.generate_image(prompt).await {
            Ok(url) => {
                self.event_bus.emit(SessionEvent::ImageReady {
                    prompt: prompt.to_string(),
                    url: url.clone(),
                });
                Ok(url)
            }
            Err(e) => {
                log::error!("Image generation failed: {}", e);
                self.event_bus.emit(SessionEvent::ImageFailed { message: e.to_string() });
                Err(e)
            }
        }
    }

    fn warn_archive(&self, outcome: &str, error: &RocketError) {
        log::warn!("Archive could not be {} ({}): {}", outcome, self.archive.backend_name(), error);
        self.event_bus.emit(SessionEvent::ArchiveWarning {
            message: format!("History could not be {}: {}", outcome, error),
        });
    }
}
