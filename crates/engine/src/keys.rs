//! Keypad layout and the physical keyboard table.
//!
//! Both front-ends resolve to a [`KeyConfig`], and every key config maps to
//! exactly one [`Action`].

use std::collections::HashSet;

use crate::domain::{Action, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Number,
    Operation,
    Function,
    Equals,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyConfig {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: KeyKind,
    pub action: Action,
    pub grid_span: u8,
    pub aria_label: &'static str,
}

const fn key(
    id: &'static str,
    label: &'static str,
    kind: KeyKind,
    action: Action,
    aria_label: &'static str,
) -> KeyConfig {
    KeyConfig {
        id,
        label,
        kind,
        action,
        grid_span: 1,
        aria_label,
    }
}

const fn digit(id: &'static str, label: &'static str, value: char) -> KeyConfig {
    key(id, label, KeyKind::Number, Action::InputDigit(value), label)
}

pub static KEYPAD_LAYOUT: [&[KeyConfig]; 5] = [
    &[
        key("fn-clear", "AC", KeyKind::Function, Action::Clear, "Clear all"),
        key("fn-negate", "±", KeyKind::Function, Action::Negate, "Toggle negative"),
        key("fn-percent", "%", KeyKind::Function, Action::Percent, "Percent"),
        key(
            "op-divide",
            "÷",
            KeyKind::Operation,
            Action::InputOperation(Operator::Divide),
            "Divide",
        ),
    ],
    &[
        digit("num-7", "7", '7'),
        digit("num-8", "8", '8'),
        digit("num-9", "9", '9'),
        key(
            "op-multiply",
            "×",
            KeyKind::Operation,
            Action::InputOperation(Operator::Multiply),
            "Multiply",
        ),
    ],
    &[
        digit("num-4", "4", '4'),
        digit("num-5", "5", '5'),
        digit("num-6", "6", '6'),
        key(
            "op-subtract",
            "-",
            KeyKind::Operation,
            Action::InputOperation(Operator::Subtract),
            "Subtract",
        ),
    ],
    &[
        digit("num-1", "1", '1'),
        digit("num-2", "2", '2'),
        digit("num-3", "3", '3'),
        key(
            "op-add",
            "+",
            KeyKind::Operation,
            Action::InputOperation(Operator::Add),
            "Add",
        ),
    ],
    &[
        KeyConfig {
            grid_span: 2,
            ..digit("num-0", "0", '0')
        },
        key("fn-decimal", ".", KeyKind::Decimal, Action::InputDecimal, "Decimal point"),
        key("fn-equals", "=", KeyKind::Equals, Action::Calculate, "Equals"),
    ],
];

/// Keys reachable from the keyboard but not drawn on the keypad.
pub static VIRTUAL_KEYS: [KeyConfig; 1] = [key(
    "fn-backspace",
    "⌫",
    KeyKind::Function,
    Action::Backspace,
    "Backspace",
)];

/// Keys that never produce an action on their own.
pub const MODIFIER_KEYS: [&str; 6] = ["Shift", "Control", "Alt", "Meta", "CapsLock", "Tab"];

pub fn all_keys() -> impl Iterator<Item = &'static KeyConfig> {
    KEYPAD_LAYOUT
        .iter()
        .flat_map(|row| row.iter())
        .chain(VIRTUAL_KEYS.iter())
}

pub fn key_by_id(id: &str) -> Option<&'static KeyConfig> {
    all_keys().find(|key| key.id == id)
}

/// Keyboard key name (DOM-style `key` value) to keypad key id.
pub fn keyboard_key_id(key: &str) -> Option<&'static str> {
    let id = match key {
        "0" => "num-0",
        "1" => "num-1",
        "2" => "num-2",
        "3" => "num-3",
        "4" => "num-4",
        "5" => "num-5",
        "6" => "num-6",
        "7" => "num-7",
        "8" => "num-8",
        "9" => "num-9",
        "+" => "op-add",
        "-" => "op-subtract",
        "*" => "op-multiply",
        "/" => "op-divide",
        "." | "," => "fn-decimal",
        "Enter" | "=" => "fn-equals",
        "Backspace" => "fn-backspace",
        "Delete" | "Escape" => "fn-clear",
        "%" => "fn-percent",
        _ => return None,
    };
    Some(id)
}

pub fn is_modifier(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}

/// Turns raw key-down/key-up events into one keypad press per physical press.
#[derive(Debug, Default)]
pub struct KeyboardTracker {
    pressed: HashSet<String>,
    active_key: Option<&'static str>,
}

impl KeyboardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key to press, or `None` for modifiers, unmapped keys and
    /// auto-repeat of a key that is still held.
    pub fn key_down(&mut self, key: &str) -> Option<&'static KeyConfig> {
        if is_modifier(key) || self.pressed.contains(key) {
            return None;
        }
        let config = keyboard_key_id(key).and_then(key_by_id)?;
        self.pressed.insert(key.to_string());
        self.active_key = Some(config.id);
        Some(config)
    }

    pub fn key_up(&mut self, key: &str) {
        if is_modifier(key) {
            return;
        }
        self.pressed.remove(key);
        if let Some(id) = keyboard_key_id(key) {
            if self.active_key == Some(id) {
                self.active_key = None;
            }
        }
    }

    /// Forget held keys, e.g. after the window loses focus and key-ups are lost.
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.active_key = None;
    }

    /// Id of the keypad key to highlight.
    pub fn active_key(&self) -> Option<&'static str> {
        self.active_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyboard_mapping_resolves_to_a_key() {
        for name in [
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "+", "-", "*", "/", ".", ",",
            "Enter", "=", "Backspace", "Delete", "Escape", "%",
        ] {
            let id = keyboard_key_id(name).expect("mapped");
            assert!(key_by_id(id).is_some(), "{name} -> {id}");
        }
    }

    #[test]
    fn keyboard_keys_map_to_expected_actions() {
        let action = |name: &str| {
            keyboard_key_id(name)
                .and_then(key_by_id)
                .map(|key| key.action)
        };
        assert_eq!(action("7"), Some(Action::InputDigit('7')));
        assert_eq!(action("*"), Some(Action::InputOperation(Operator::Multiply)));
        assert_eq!(action(","), Some(Action::InputDecimal));
        assert_eq!(action("Enter"), Some(Action::Calculate));
        assert_eq!(action("Escape"), Some(Action::Clear));
        assert_eq!(action("Backspace"), Some(Action::Backspace));
        assert_eq!(action("%"), Some(Action::Percent));
        assert_eq!(action("x"), None);
    }

    #[test]
    fn keypad_has_unique_ids_and_zero_spans_two_columns() {
        let ids: HashSet<_> = all_keys().map(|key| key.id).collect();
        assert_eq!(ids.len(), all_keys().count());
        assert_eq!(key_by_id("num-0").map(|key| key.grid_span), Some(2));
        assert_eq!(KEYPAD_LAYOUT[0].len(), 4);
        assert_eq!(KEYPAD_LAYOUT[4].len(), 3);
    }

    #[test]
    fn repeat_is_suppressed_until_release() {
        let mut tracker = KeyboardTracker::new();
        assert_eq!(tracker.key_down("5").map(|key| key.id), Some("num-5"));
        assert!(tracker.key_down("5").is_none());
        assert_eq!(tracker.active_key(), Some("num-5"));
        tracker.key_up("5");
        assert_eq!(tracker.active_key(), None);
        assert!(tracker.key_down("5").is_some());
    }

    #[test]
    fn modifiers_and_unmapped_keys_are_ignored() {
        let mut tracker = KeyboardTracker::new();
        assert!(tracker.key_down("Shift").is_none());
        assert!(tracker.key_down("Control").is_none());
        assert!(tracker.key_down("q").is_none());
        assert_eq!(tracker.active_key(), None);
    }

    #[test]
    fn releasing_another_key_keeps_highlight() {
        let mut tracker = KeyboardTracker::new();
        tracker.key_down("1");
        tracker.key_down("2");
        tracker.key_up("1");
        assert_eq!(tracker.active_key(), Some("num-2"));
        tracker.release_all();
        assert!(tracker.key_down("2").is_some());
    }
}
