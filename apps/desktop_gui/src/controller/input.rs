//! egui keyboard events to keypad presses.
//!
//! Named keys come through `Event::Key`. `*` and `%` have no egui key and only
//! arrive as `Event::Text`, so they are tied to the shifted key that produced
//! them and released with it. Text with no known key stays held until the next
//! key release.

use std::collections::{HashMap, HashSet};

use engine::keys::{KeyConfig, KeyboardTracker};

#[derive(Debug, Default)]
pub struct KeyboardInput {
    tracker: KeyboardTracker,
    /// Shifted key waiting for the text it produces.
    pending_shifted: Option<egui::Key>,
    /// Shifted key to the text name it is holding down.
    held_text: HashMap<egui::Key, &'static str>,
    /// Text names held without a known key.
    untied_text: HashSet<&'static str>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_key(&self) -> Option<&'static str> {
        self.tracker.active_key()
    }

    /// Keys to press for this frame's events, in order.
    pub fn handle_events(&mut self, events: &[egui::Event]) -> Vec<&'static KeyConfig> {
        let mut pressed = Vec::new();
        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    if modifiers.command || modifiers.ctrl {
                        continue;
                    }
                    if modifiers.shift && is_digit_key(*key) {
                        self.pending_shifted = Some(*key);
                        continue;
                    }
                    if let Some(config) =
                        key_name(*key).and_then(|name| self.tracker.key_down(name))
                    {
                        pressed.push(config);
                    }
                }
                egui::Event::Key {
                    key,
                    pressed: false,
                    ..
                } => {
                    if self.pending_shifted == Some(*key) {
                        self.pending_shifted = None;
                    }
                    if let Some(text) = self.held_text.remove(key) {
                        self.tracker.key_up(text);
                    }
                    for text in self.untied_text.drain() {
                        self.tracker.key_up(text);
                    }
                    if let Some(name) = key_name(*key) {
                        self.tracker.key_up(name);
                    }
                }
                egui::Event::Text(text) => {
                    for ch in text.chars() {
                        let Some(name) = text_key_name(ch) else {
                            continue;
                        };
                        let config = self.tracker.key_down(name);
                        match self.pending_shifted.take() {
                            Some(physical) => {
                                self.held_text.insert(physical, name);
                            }
                            None => {
                                self.untied_text.insert(name);
                            }
                        }
                        if let Some(config) = config {
                            pressed.push(config);
                        }
                    }
                }
                egui::Event::WindowFocused(false) => self.release_all(),
                _ => {}
            }
        }
        pressed
    }

    pub fn release_all(&mut self) {
        self.tracker.release_all();
        self.pending_shifted = None;
        self.held_text.clear();
        self.untied_text.clear();
    }
}

fn is_digit_key(key: egui::Key) -> bool {
    matches!(
        key,
        egui::Key::Num0
            | egui::Key::Num1
            | egui::Key::Num2
            | egui::Key::Num3
            | egui::Key::Num4
            | egui::Key::Num5
            | egui::Key::Num6
            | egui::Key::Num7
            | egui::Key::Num8
            | egui::Key::Num9
    )
}

/// egui key to the keyboard name understood by [`KeyboardTracker`].
fn key_name(key: egui::Key) -> Option<&'static str> {
    let name = match key {
        egui::Key::Num0 => "0",
        egui::Key::Num1 => "1",
        egui::Key::Num2 => "2",
        egui::Key::Num3 => "3",
        egui::Key::Num4 => "4",
        egui::Key::Num5 => "5",
        egui::Key::Num6 => "6",
        egui::Key::Num7 => "7",
        egui::Key::Num8 => "8",
        egui::Key::Num9 => "9",
        egui::Key::Plus => "+",
        egui::Key::Minus => "-",
        egui::Key::Slash => "/",
        egui::Key::Period => ".",
        egui::Key::Comma => ",",
        egui::Key::Enter => "Enter",
        egui::Key::Equals => "=",
        egui::Key::Backspace => "Backspace",
        egui::Key::Delete => "Delete",
        egui::Key::Escape => "Escape",
        egui::Key::Tab => "Tab",
        _ => return None,
    };
    Some(name)
}

fn text_key_name(ch: char) -> Option<&'static str> {
    match ch {
        '*' => Some("*"),
        '%' => Some("%"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/input_tests.rs"]
mod tests;
