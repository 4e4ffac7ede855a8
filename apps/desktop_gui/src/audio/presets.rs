//! Tone shapes per feedback category.

use std::time::Duration;

use engine::FeedbackCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

/// One oscillator note with a linear attack/decay envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonePreset {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub waveform: Waveform,
    pub volume: f32,
    pub attack: Duration,
    pub decay: Duration,
    pub detune_cents: f32,
}

const fn tone(
    frequency_hz: f32,
    duration_ms: u64,
    waveform: Waveform,
    volume: f32,
    attack_ms: u64,
    decay_ms: u64,
    detune_cents: f32,
) -> TonePreset {
    TonePreset {
        frequency_hz,
        duration: Duration::from_millis(duration_ms),
        waveform,
        volume,
        attack: Duration::from_millis(attack_ms),
        decay: Duration::from_millis(decay_ms),
        detune_cents,
    }
}

pub const STARTUP_CHORD_HZ: [f32; 3] = [400.0, 500.0, 700.0];
pub const STARTUP_STAGGER: Duration = Duration::from_millis(100);
const STARTUP_CHORD_VOLUME: f32 = 0.18;

pub fn preset_for(category: FeedbackCategory) -> TonePreset {
    match category {
        FeedbackCategory::KeyClick => tone(800.0, 50, Waveform::Sine, 0.15, 5, 40, 0.0),
        FeedbackCategory::OperationClick => {
            tone(600.0, 80, Waveform::Triangle, 0.2, 5, 70, -100.0)
        }
        FeedbackCategory::Equals => tone(1200.0, 150, Waveform::Sine, 0.25, 10, 120, 0.0),
        FeedbackCategory::Clear => tone(400.0, 120, Waveform::Sawtooth, 0.15, 10, 100, 0.0),
        FeedbackCategory::Error => tone(200.0, 300, Waveform::Square, 0.2, 10, 250, 50.0),
        FeedbackCategory::PanelOpen => tone(1000.0, 100, Waveform::Sine, 0.1, 10, 80, 0.0),
        FeedbackCategory::PanelClose => tone(700.0, 100, Waveform::Sine, 0.1, 10, 80, 0.0),
        FeedbackCategory::Startup => tone(500.0, 500, Waveform::Sine, 0.2, 50, 400, 0.0),
    }
}

/// Rising three-note chord, each note delayed by [`STARTUP_STAGGER`].
pub fn startup_chord() -> impl Iterator<Item = (TonePreset, Duration)> {
    let base = preset_for(FeedbackCategory::Startup);
    STARTUP_CHORD_HZ
        .into_iter()
        .zip(0u32..)
        .map(move |(frequency_hz, index)| {
            (
                TonePreset {
                    frequency_hz,
                    volume: STARTUP_CHORD_VOLUME,
                    ..base
                },
                STARTUP_STAGGER * index,
            )
        })
}
