//! Active Code panel: read-only view of the active thread's mirrored block.

use egui::{self, Align, Layout, RichText, ScrollArea};
use bugrocket_core::session::Session;
use crate::state::{CopyTarget, UiState};
use crate::theme::*;

/// Render the code viewer. Returns the content when Copy was clicked.
pub fn code_panel(ui: &mut egui::Ui, state: &mut UiState, session: &Session) -> Option<String> {
    let persona = session.active_persona();
    let code = session.mirror();
    let mut copied = None;

    egui::Frame::default()
        .fill(CODE_BG)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            // Header
            ui.horizontal(|ui| {
                ui.label(RichText::new("📄 ACTIVE CODE").color(accent(persona)).monospace().strong());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = if state.is_copied(CopyTarget::Mirror) { "✔ Copied" } else { "Copy" };
                    if ui.small_button(label).clicked() {
                        copied = Some(code.content.clone());
                    }
                    ui.label(
                        RichText::new(format!("{} chars", code.char_count()))
                            .color(TEXT_MUTED)
                            .monospace()
                            .small(),
                    );
                });
            });
            ui.separator();

            let footer_height = 22.0;
            ScrollArea::both()
                .max_height(ui.available_height() - footer_height)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let gutter_width = code.line_count().to_string().len();
                    for (number, line) in code.content.lines().enumerate() {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(format!("{:>width$}", number + 1, width = gutter_width))
                                    .color(CODE_GUTTER)
                                    .monospace(),
                            );
                            ui.label(RichText::new(line).color(TEXT_PRIMARY).monospace());
                        });
                    }
                });

            // Footer
            ui.separator();
            ui.horizontal(|ui| {
                ui.label(footer_text(format!("Ln {}", code.line_count())));
                ui.label(footer_text("UTF-8".to_string()));
                ui.label(footer_text(code.language.to_uppercase()));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(footer_text(format!("{} MODE", persona.as_str().to_uppercase())));
                    ui.label(RichText::new("●").color(accent(persona)).small());
                });
            });
        });

    if copied.is_some() {
        state.mark_copied(CopyTarget::Mirror);
    }
    copied
}

fn footer_text(text: String) -> RichText {
    RichText::new(text).color(TEXT_MUTED).monospace().small()
}
