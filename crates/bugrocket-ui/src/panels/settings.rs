//! Settings panel: server endpoints, storage mode and archive key.
//! Includes an explicit Save button with visual feedback.

use egui::{self, RichText, Vec2};
use bugrocket_types::config::{AppConfig, StorageBackendType};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut AppConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Server Section ───────────────────────────────
            ui.label(RichText::new("Server").color(CHAT_ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("API Base URL (empty = same origin)").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::TextEdit::singleline(&mut config.api_base).hint_text("http://localhost:3000"))
                .changed()
            {
                changed = true;
            }

            ui.add_space(4.0);
            ui.label(RichText::new("Chat path").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut config.chat_path).changed() {
                changed = true;
            }

            ui.add_space(4.0);
            ui.label(RichText::new("Image path").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut config.image_path).changed() {
                changed = true;
            }

            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("→ {}", config.chat_url()))
                    .color(TEXT_MUTED)
                    .monospace()
                    .small(),
            );

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage Section ──────────────────────────────
            ui.label(RichText::new("Storage").color(CHAT_ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(config.storage.backend.label())
                .show_ui(ui, |ui| {
                    for backend in StorageBackendType::all() {
                        if ui
                            .selectable_value(&mut config.storage.backend, backend.clone(), backend.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(storage_description(&config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            ui.add_space(4.0);
            ui.label(RichText::new("History key").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut config.archive_key).changed() {
                changed = true;
            }

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(CHAT_ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
            ui.label(
                RichText::new("Storage and history key apply after a reload.")
                    .color(TEXT_MUTED)
                    .small(),
            );
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Uses localStorage when the browser allows it, otherwise memory.",
        StorageBackendType::Memory => "Volatile. History is lost on page reload.",
        StorageBackendType::LocalStorage => "Persistent per-origin storage. History survives reloads.",
    }
}
