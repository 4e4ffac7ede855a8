//! Backend worker: owns the preference store and serves UI commands off the UI thread.

pub mod commands;
pub mod runtime;
