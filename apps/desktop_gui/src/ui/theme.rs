//! Neon-on-dark palette.

use egui::Color32;
use engine::keys::KeyKind;

pub const BG_DEEP: Color32 = Color32::from_rgb(10, 10, 15);
pub const BG_SURFACE: Color32 = Color32::from_rgb(15, 15, 25);
pub const DISPLAY_FILL: Color32 = Color32::from_rgb(20, 20, 32);
pub const GLASS_BORDER: Color32 = Color32::from_rgb(48, 48, 60);

pub const NEON_CYAN: Color32 = Color32::from_rgb(0, 240, 255);
pub const NEON_PURPLE: Color32 = Color32::from_rgb(180, 74, 255);
pub const NEON_PINK: Color32 = Color32::from_rgb(255, 45, 124);
pub const ERROR: Color32 = Color32::from_rgb(255, 51, 85);

pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(153, 153, 160);
pub const TEXT_DIM: Color32 = Color32::from_rgb(90, 90, 100);

const NUMBER_FILL: Color32 = Color32::from_rgb(32, 32, 44);
const FUNCTION_FILL: Color32 = Color32::from_rgb(44, 44, 58);

pub const PANEL_ROUNDING: u8 = 16;
pub const KEY_ROUNDING: u8 = 12;

pub fn visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    v.override_text_color = Some(TEXT_PRIMARY);
    v.window_fill = BG_SURFACE;
    v.panel_fill = BG_DEEP;
    v.extreme_bg_color = DISPLAY_FILL;
    v.faint_bg_color = BG_SURFACE;
    v.hyperlink_color = NEON_CYAN;
    v.selection.bg_fill = NEON_PURPLE;
    v.window_corner_radius = egui::CornerRadius::same(PANEL_ROUNDING);
    v.widgets.hovered.bg_fill = NEON_PURPLE.gamma_multiply(0.85);
    v.widgets.active.bg_fill = NEON_PURPLE;
    v
}

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals = visuals();
    style.spacing.item_spacing = egui::vec2(10.0, 10.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}

pub fn key_fill(kind: KeyKind) -> Color32 {
    match kind {
        KeyKind::Number | KeyKind::Decimal => NUMBER_FILL,
        KeyKind::Function => FUNCTION_FILL,
        KeyKind::Operation => NEON_PURPLE.gamma_multiply(0.55),
        KeyKind::Equals => NEON_CYAN.gamma_multiply(0.6),
    }
}

pub fn key_accent(kind: KeyKind) -> Color32 {
    match kind {
        KeyKind::Number | KeyKind::Decimal | KeyKind::Function => GLASS_BORDER,
        KeyKind::Operation => NEON_PURPLE,
        KeyKind::Equals => NEON_CYAN,
    }
}

/// Brighten `c` toward white by `t` in `0.0..=1.0`.
pub fn lighten(c: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}
