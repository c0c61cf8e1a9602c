//! UI-level state that drives rendering.
//! Conversation content is read from the runtime's `Session` each frame;
//! this holds the rest, updated by draining the EventBus.

use bugrocket_types::event::SessionEvent;
use bugrocket_types::message::Attachment;
use bugrocket_types::persona::Persona;
use crate::attachments::encode_attachment;

/// Banner shown above the chat until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Error,
}

/// Something with a Copy button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    /// The active-code viewer
    Mirror,
    /// Fenced block `block` of message `message` in the active thread
    Block { message: usize, block: usize },
}

/// Generated images kept in the sidebar
pub const IMAGE_HISTORY: usize = 5;

const COPIED_SECS: f32 = 2.0;

/// An image returned by the image endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub prompt: String,
    pub url: String,
}

/// State visible to UI panels
pub struct UiState {
    /// Input field content
    pub input_text: String,
    /// Files staged for the next submission
    pub pending_attachments: Vec<Attachment>,
    pub show_sidebar: bool,
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
    pub notice: Option<Notice>,
    pub image_prompt: String,
    pub image_pending: bool,
    /// Newest first, at most [`IMAGE_HISTORY`]
    pub images: Vec<GeneratedImage>,
    /// Second click on "Clear" needed while set
    pub confirm_clear: bool,
    /// Last thing copied, labelled "Copied" while `copied_for` runs
    pub copied: Option<CopyTarget>,
    /// Seconds left on the "Copied" label
    pub copied_for: f32,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            pending_attachments: Vec::new(),
            show_sidebar: true,
            show_settings: false,
            status_text: "Ready".to_string(),
            notice: None,
            image_prompt: String::new(),
            image_pending: false,
            images: Vec::new(),
            confirm_clear: false,
            copied: None,
            copied_for: 0.0,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::TurnStart { persona } => {
                    self.status_text = thinking(persona);
                }
                SessionEvent::Complete { persona, chars } => {
                    self.status_text = format!("{} replied ({} chars)", persona.label(), chars);
                }
                SessionEvent::CodeMirrored { persona, language } => {
                    self.status_text = format!("{}: mirrored {} code", persona.label(), language);
                }
                SessionEvent::TurnEnd { persona } => {
                    if self.status_text == thinking(persona) {
                        self.status_text = "Ready".to_string();
                    }
                }
                SessionEvent::Error { persona, message } => {
                    self.status_text = format!("{}: error", persona.label());
                    self.notice = Some(Notice {
                        message: format!("{} reply failed: {}", persona.label(), message),
                        kind: NoticeKind::Error,
                    });
                }
                SessionEvent::ArchiveWarning { message } => {
                    self.notice = Some(Notice {
                        message,
                        kind: NoticeKind::Warning,
                    });
                }
                SessionEvent::ImageReady { prompt, url } => {
                    self.image_pending = false;
                    self.images.insert(0, GeneratedImage { prompt, url });
                    self.images.truncate(IMAGE_HISTORY);
                }
                SessionEvent::ImageFailed { message } => {
                    self.image_pending = false;
                    self.notice = Some(Notice {
                        message: format!("Image generation failed: {}", message),
                        kind: NoticeKind::Error,
                    });
                }
            }
        }
    }

    /// Stage a dropped file for the next submission.
    pub fn stage_file(&mut self, name: &str, mime: &str, bytes: &[u8]) {
        match encode_attachment(name, mime, bytes) {
            Ok(attachment) => {
                log::info!("Staged attachment {} ({} bytes)", name, bytes.len());
                self.pending_attachments.push(attachment);
            }
            Err(message) => {
                self.notice = Some(Notice {
                    message,
                    kind: NoticeKind::Warning,
                });
            }
        }
    }

    pub fn unstage(&mut self, index: usize) {
        if index < self.pending_attachments.len() {
            self.pending_attachments.remove(index);
        }
    }

    /// True when there is something to send
    pub fn can_submit(&self) -> bool {
        !self.input_text.trim().is_empty() || !self.pending_attachments.is_empty()
    }

    /// Take the input and staged files, leaving both empty. The text is sent
    /// as typed so pasted code keeps its indentation.
    pub fn take_submission(&mut self) -> Option<(String, Vec<Attachment>)> {
        if !self.can_submit() {
            return None;
        }
        let text = std::mem::take(&mut self.input_text);
        let attachments = std::mem::take(&mut self.pending_attachments);
        Some((text, attachments))
    }

    /// Forget what belonged to the previous conversation.
    pub fn reset_for(&mut self, persona: Persona) {
        self.input_text.clear();
        self.pending_attachments.clear();
        self.notice = None;
        self.copied = None;
        self.copied_for = 0.0;
        self.status_text = format!("{} ready", persona.label());
    }

    pub fn mark_copied(&mut self, target: CopyTarget) {
        self.copied = Some(target);
        self.copied_for = COPIED_SECS;
    }

    pub fn is_copied(&self, target: CopyTarget) -> bool {
        self.copied_for > 0.0 && self.copied == Some(target)
    }

    /// Count down transient labels by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.copied_for = (self.copied_for - dt).max(0.0);
        if self.copied_for == 0.0 {
            self.copied = None;
        }
    }
}

fn thinking(persona: Persona) -> String {
    format!("{} is thinking...", persona.label())
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
