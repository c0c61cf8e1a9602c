//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};
use bugrocket_types::persona::Persona;

pub const BG_PRIMARY: Color32 = Color32::from_rgb(0, 0, 0);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(24, 24, 27);
pub const BG_SURFACE: Color32 = Color32::from_rgb(39, 39, 42);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 228, 231);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(161, 161, 170);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(82, 82, 91);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const CODE_BG: Color32 = Color32::from_rgb(9, 9, 11);
pub const CODE_GUTTER: Color32 = Color32::from_rgb(63, 63, 70);

pub const CHAT_ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
pub const DEBUG_ACCENT: Color32 = Color32::from_rgb(220, 38, 38);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Blue for the builder, red for the auditor
pub fn accent(persona: Persona) -> Color32 {
    match persona {
        Persona::Chat => CHAT_ACCENT,
        Persona::Debug => DEBUG_ACCENT,
    }
}

/// Tinted fill for user bubbles and chips
pub fn soft_accent(persona: Persona) -> Color32 {
    accent(persona).linear_multiply(0.15)
}

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context, persona: Persona) {
    let accent = accent(persona);
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = CODE_BG;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = accent;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = accent.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, accent);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
