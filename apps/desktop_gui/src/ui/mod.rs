//! UI layer for the calculator window: app shell, theme, and widgets.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::CalculatorApp;
