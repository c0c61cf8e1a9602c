//! Image generator: prompt field and the URLs generated so far.

use egui::{self, RichText};
use crate::state::UiState;
use crate::theme::*;

/// Returns the prompt when the user asked for a new image.
pub fn image_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<String> {
    let mut requested = None;

    ui.label(RichText::new("IMAGE").color(TEXT_SECONDARY).small().strong());
    ui.separator();

    ui.add(
        egui::TextEdit::singleline(&mut state.image_prompt)
            .hint_text("Describe an image...")
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        let enabled = !state.image_pending && !state.image_prompt.trim().is_empty();
        if ui.add_enabled(enabled, egui::Button::new("🎨 Generate")).clicked() {
            state.image_pending = true;
            requested = Some(state.image_prompt.trim().to_string());
        }
        if state.image_pending {
            ui.spinner();
        }
    });

    for image in state.images.iter().take(5) {
        ui.hyperlink_to(RichText::new(&image.prompt).small(), &image.url);
    }

    requested
}
