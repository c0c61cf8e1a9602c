//! Chat panel: the active persona's thread, staged files and the input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use bugrocket_core::scanner::{split_segments, FencedBlock, Segment};
use bugrocket_core::session::Session;
use bugrocket_types::message::{Attachment, Message};
use bugrocket_types::persona::Persona;
use crate::state::{CopyTarget, NoticeKind, UiState};
use crate::theme::*;

/// What the user asked for this frame
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Submit {
        text: String,
        attachments: Vec<Attachment>,
    },
    /// Put a code block's body on the clipboard
    Copy(String),
}

/// Render the chat panel. Returns an action when the user sends something
/// or copies a code block.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState, session: &Session) -> Option<ChatAction> {
    let persona = session.active_persona();
    let thread = session.active_thread();
    let busy = thread.is_busy();
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                notice_banner(ui, state);

                // Messages area
                let available_height = ui.available_height() - 90.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if thread.is_empty() {
                            welcome(ui, persona);
                        }
                        let mut copied = None;
                        for (index, message) in thread.messages().iter().enumerate() {
                            if let Some(hit) = render_message(ui, state, index, message, persona) {
                                copied = Some(hit);
                            }
                            ui.add_space(6.0);
                        }
                        if let Some((target, body)) = copied {
                            state.mark_copied(target);
                            action = Some(ChatAction::Copy(body));
                        }

                        // Reply still streaming in
                        if busy {
                            egui::Frame::default()
                                .fill(BG_SECONDARY)
                                .corner_radius(PANEL_ROUNDING)
                                .inner_margin(8.0)
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new(thread.streaming_text())
                                            .color(TEXT_PRIMARY),
                                    );
                                    ui.label(RichText::new("▌").color(accent(persona)).strong());
                                });
                        }
                    });

                ui.add_space(6.0);

                // Debug quick actions
                let quick = persona.quick_actions();
                if !quick.is_empty() && !thread.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        for label in quick {
                            let chip = egui::Button::new(
                                RichText::new(format!("⚡ {}", label)).color(accent(persona)).small(),
                            )
                            .fill(soft_accent(persona))
                            .corner_radius(PANEL_ROUNDING);
                            if ui.add_enabled(!busy, chip).clicked() {
                                action = Some(ChatAction::Submit {
                                    text: label.to_string(),
                                    attachments: Vec::new(),
                                });
                            }
                        }
                    });
                }

                staged_files(ui, state);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text(persona.input_hint())
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add(input);

                    let send_enabled = state.can_submit() && !busy;
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("🚀 Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { accent(persona) } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if (enter && send_enabled) || send_btn.clicked() {
                        if let Some((text, attachments)) = state.take_submission() {
                            action = Some(ChatAction::Submit { text, attachments });
                        }
                        response.request_focus();
                    }
                });
            });
        });

    action
}

fn notice_banner(ui: &mut egui::Ui, state: &mut UiState) {
    let Some(notice) = state.notice.clone() else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Warning => WARNING,
        NoticeKind::Error => ERROR,
    };
    egui::Frame::default()
        .fill(color.linear_multiply(0.15))
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&notice.message).color(color).small());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        state.notice = None;
                    }
                });
            });
        });
    ui.add_space(4.0);
}

fn welcome(ui: &mut egui::Ui, persona: Persona) {
    ui.add_space(ui.available_height() / 3.0);
    ui.vertical_centered(|ui| {
        let icon = match persona {
            Persona::Chat => "💬",
            Persona::Debug => "🐞",
        };
        ui.label(RichText::new(icon).size(32.0).color(accent(persona)));
        ui.label(RichText::new(persona.welcome()).color(TEXT_MUTED));
    });
}

fn staged_files(ui: &mut egui::Ui, state: &mut UiState) {
    if state.pending_attachments.is_empty() {
        return;
    }
    let mut removed = None;
    ui.horizontal_wrapped(|ui| {
        for (index, attachment) in state.pending_attachments.iter().enumerate() {
            ui.label(RichText::new(format!("📎 {}", attachment.name)).color(TEXT_SECONDARY).small());
            if ui.small_button("✕").clicked() {
                removed = Some(index);
            }
        }
    });
    if let Some(index) = removed {
        state.unstage(index);
    }
}

/// Draw one message. Returns the block the user copied, if any.
fn render_message(
    ui: &mut egui::Ui,
    state: &UiState,
    index: usize,
    message: &Message,
    persona: Persona,
) -> Option<(CopyTarget, String)> {
    let (label, label_color, bg) = if message.is_user() {
        ("You", accent(persona), soft_accent(persona))
    } else {
        ("BugRocket", TEXT_SECONDARY, BG_SECONDARY)
    };

    let layout = if message.is_user() {
        Layout::top_down(Align::Max)
    } else {
        Layout::top_down(Align::Min)
    };

    let mut copied = None;
    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(bg)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.9);
                ui.label(RichText::new(label).color(label_color).strong().small());
                for attachment in &message.attachments {
                    ui.label(
                        RichText::new(format!("📎 {}", attachment.name))
                            .color(TEXT_SECONDARY)
                            .small(),
                    );
                }
                if message.content.is_empty() {
                    return;
                }
                if message.is_user() {
                    ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
                    return;
                }

                let mut block_index = 0;
                for segment in split_segments(&message.content) {
                    match segment {
                        Segment::Prose(text) => {
                            ui.label(RichText::new(text).color(TEXT_PRIMARY));
                        }
                        Segment::Code(block) => {
                            let target = CopyTarget::Block { message: index, block: block_index };
                            if code_block(ui, &block, state.is_copied(target)) {
                                copied = Some((target, block.body));
                            }
                            block_index += 1;
                        }
                    }
                }
            });
    });
    copied
}

/// A fenced block inside a reply. Returns true when Copy was clicked.
fn code_block(ui: &mut egui::Ui, block: &FencedBlock, copied: bool) -> bool {
    let mut clicked = false;
    egui::Frame::default()
        .fill(CODE_BG)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&block.language).color(TEXT_MUTED).monospace().small());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = if copied { "✔ Copied" } else { "Copy" };
                    clicked = ui.small_button(label).clicked();
                });
            });
            ui.separator();
            ui.label(RichText::new(&block.body).color(TEXT_PRIMARY).monospace());
        });
    ui.add_space(4.0);
    clicked
}
