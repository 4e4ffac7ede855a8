//! Controller layer: UI events, keyboard adaptation, and command orchestration.

pub mod events;
pub mod input;
pub mod orchestration;
