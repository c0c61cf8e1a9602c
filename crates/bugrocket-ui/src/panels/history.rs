//! History sidebar: archived sessions, most recent first.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use bugrocket_core::archive::Archive;
use bugrocket_types::archive::ArchiveEntry;
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    Load(String),
    Delete(String),
    Clear,
}

pub fn history_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    archive: &Archive,
    active_id: &str,
) -> Option<HistoryAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("HISTORY").color(TEXT_SECONDARY).small().strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if state.confirm_clear {
                if ui.small_button(RichText::new("Confirm").color(ERROR)).clicked() {
                    action = Some(HistoryAction::Clear);
                    state.confirm_clear = false;
                }
                if ui.small_button("Cancel").clicked() {
                    state.confirm_clear = false;
                }
            } else if ui
                .add_enabled(!archive.is_empty(), egui::Button::new("🗑").small())
                .on_hover_text("Clear history")
                .clicked()
            {
                state.confirm_clear = true;
            }
        });
    });
    ui.separator();

    // Leave room for the image generator below
    ScrollArea::vertical()
        .max_height((ui.available_height() - 160.0).max(80.0))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            archive.with_entries(|entries| {
                if entries.is_empty() {
                    ui.label(RichText::new("No saved sessions").color(TEXT_MUTED).small().italics());
                }
                for entry in entries {
                    if let Some(a) = entry_row(ui, entry, entry.id == active_id) {
                        action = Some(a);
                    }
                }
            });
        });

    action
}

fn entry_row(ui: &mut egui::Ui, entry: &ArchiveEntry, active: bool) -> Option<HistoryAction> {
    let mut action = None;
    let fill = if active { BG_SURFACE } else { BG_SECONDARY };

    egui::Frame::default()
        .fill(fill)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                let title = RichText::new(&entry.title)
                    .color(if active { TEXT_PRIMARY } else { TEXT_SECONDARY })
                    .small();
                if ui
                    .add(egui::Button::new(title).frame(false).min_size(Vec2::new(0.0, 18.0)))
                    .clicked()
                {
                    action = Some(HistoryAction::Load(entry.id.clone()));
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("✕").on_hover_text("Delete").clicked() {
                        action = Some(HistoryAction::Delete(entry.id.clone()));
                    }
                });
            });
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(accent(entry.persona)).small());
                ui.label(
                    RichText::new(format!("{} · {}", entry.date.format("%Y-%m-%d"), entry.persona.label()))
                        .color(TEXT_MUTED)
                        .small(),
                );
            });
        });
    ui.add_space(4.0);
    action
}
