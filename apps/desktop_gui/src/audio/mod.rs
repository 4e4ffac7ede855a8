//! Feedback tones, owned by the app shell and handed out by `&mut`.

pub mod presets;

use std::time::Duration;

use engine::FeedbackCategory;

pub use presets::{preset_for, TonePreset};

/// Output device for tones.
pub trait ToneSink: Send {
    fn open(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn play_tone(&mut self, tone: &TonePreset, start_offset: Duration);

    fn close(&mut self) {}
}

/// Records each cue to the log instead of synthesising audio.
#[derive(Debug, Default)]
pub struct TracingToneSink;

impl ToneSink for TracingToneSink {
    fn play_tone(&mut self, tone: &TonePreset, start_offset: Duration) {
        tracing::debug!(
            frequency_hz = tone.frequency_hz,
            detune_cents = tone.detune_cents,
            waveform = ?tone.waveform,
            volume = tone.volume,
            attack_ms = tone.attack.as_millis() as u64,
            decay_ms = tone.decay.as_millis() as u64,
            duration_ms = tone.duration.as_millis() as u64,
            offset_ms = start_offset.as_millis() as u64,
            "tone"
        );
    }
}

pub struct SoundEngine {
    sink: Box<dyn ToneSink>,
    muted: bool,
    initialized: bool,
}

impl SoundEngine {
    pub fn new(sink: Box<dyn ToneSink>, muted: bool) -> Self {
        Self {
            sink,
            muted,
            initialized: false,
        }
    }

    pub fn with_tracing_sink(muted: bool) -> Self {
        Self::new(Box::new(TracingToneSink), muted)
    }

    /// Open the sink. A sink that fails to open leaves the engine silent.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        match self.sink.open() {
            Ok(()) => self.initialized = true,
            Err(err) => tracing::warn!("sound output unavailable: {err:#}"),
        }
    }

    pub fn dispose(&mut self) {
        if !self.initialized {
            return;
        }
        self.sink.close();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn play(&mut self, category: FeedbackCategory) {
        if self.muted || !self.initialized {
            return;
        }
        if category == FeedbackCategory::Startup {
            for (tone, offset) in presets::startup_chord() {
                self.sink.play_tone(&tone, offset);
            }
            return;
        }
        self.sink.play_tone(&preset_for(category), Duration::ZERO);
    }
}

impl Drop for SoundEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
