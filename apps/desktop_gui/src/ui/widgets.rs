//! Small reusable widgets for the calculator window.

use chrono::{DateTime, Local};
use engine::{keys::KeyConfig, HistoryEntry};

use crate::ui::theme;

pub const KEY_HEIGHT: f32 = 56.0;

/// Point size for the main readout; long values shrink to stay on one line.
pub fn display_font_size(text: &str) -> f32 {
    match text.chars().count() {
        0..=8 => 44.0,
        9..=11 => 36.0,
        12..=14 => 30.0,
        _ => 24.0,
    }
}

/// Width of a key spanning `span` grid columns.
pub fn key_width(unit: f32, span: u8, spacing: f32) -> f32 {
    let span = f32::from(span.max(1));
    unit * span + spacing * (span - 1.0)
}

pub fn keypad_button(key: &KeyConfig, width: f32, active: bool) -> egui::Button<'static> {
    let fill = theme::key_fill(key.kind);
    let fill = if active { theme::lighten(fill, 0.35) } else { fill };
    let stroke_width = if active { 2.0 } else { 1.0 };
    egui::Button::new(egui::RichText::new(key.label).size(22.0).strong())
        .min_size(egui::vec2(width, KEY_HEIGHT))
        .fill(fill)
        .stroke(egui::Stroke::new(stroke_width, theme::key_accent(key.kind)))
        .corner_radius(egui::CornerRadius::same(theme::KEY_ROUNDING))
}

pub fn icon_btn(icon: &str, active: bool) -> egui::Button<'static> {
    let color = if active { theme::NEON_CYAN } else { theme::TEXT_SECONDARY };
    egui::Button::new(egui::RichText::new(icon).size(18.0).color(color))
        .min_size(egui::vec2(32.0, 32.0))
        .stroke(egui::Stroke::NONE)
        .fill(egui::Color32::TRANSPARENT)
}

/// Local wall-clock time of a history entry, `--:--` when out of range.
pub fn history_time_label(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// One clickable history row; returns true when clicked.
pub fn history_row(ui: &mut egui::Ui, entry: &HistoryEntry) -> bool {
    let response = egui::Frame::new()
        .fill(theme::BG_SURFACE)
        .stroke(egui::Stroke::new(1.0, theme::GLASS_BORDER))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(&entry.expression)
                        .size(13.0)
                        .color(theme::TEXT_SECONDARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(history_time_label(entry.timestamp))
                            .size(11.0)
                            .color(theme::TEXT_DIM),
                    );
                });
            });
            ui.label(
                egui::RichText::new(format!("= {}", entry.result))
                    .size(18.0)
                    .color(theme::NEON_CYAN),
            );
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    response.clicked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_values_get_smaller_font() {
        assert!(display_font_size("123456789012") < display_font_size("12"));
        assert_eq!(display_font_size("1.23456789e+25"), 30.0);
        assert_eq!(display_font_size("-123456789012.5"), 24.0);
    }

    #[test]
    fn spanning_keys_cover_the_gap() {
        assert_eq!(key_width(60.0, 1, 10.0), 60.0);
        assert_eq!(key_width(60.0, 2, 10.0), 130.0);
        assert_eq!(key_width(60.0, 0, 10.0), 60.0);
    }

    #[test]
    fn out_of_range_timestamps_are_placeholder() {
        assert_eq!(history_time_label(i64::MAX), "--:--");
        assert_eq!(history_time_label(0).len(), 8);
    }
}
