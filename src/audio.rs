//! Audio cues
//!
//! Procedurally generated sound effects via the Web Audio API (wasm only).
//! The event-to-sound mapping is plain code and available everywhere.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bird jumps
    Flap,
    /// Obstacle passed
    Score,
    /// Cosmetic unlocked
    Unlock,
    /// Run ended on a new best
    NewHighScore,
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped => Some(SoundEffect::Flap),
            GameEvent::Passed { .. } => Some(SoundEffect::Score),
            GameEvent::Crashed(_) => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_sfx_volume(),
                muted: false,
            }
        }

        /// Pick up volume changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_sfx_volume();
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = if self.muted { 0.0 } else { self.volume };
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flap => sweep(ctx, vol * 0.3, 300.0, 600.0, 0.12),
                SoundEffect::Score => sweep(ctx, vol * 0.25, 880.0, 880.0, 0.1),
                SoundEffect::Unlock => arpeggio(ctx, vol * 0.25, &[600.0, 800.0, 1000.0], 0.08, 0.2),
                SoundEffect::NewHighScore => {
                    arpeggio(ctx, vol * 0.25, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08, 0.3)
                }
                SoundEffect::GameOver => arpeggio(ctx, vol * 0.3, &[400.0, 350.0, 300.0, 200.0], 0.2, 0.4),
            }
        }
    }

    /// Oscillator routed through a gain node to the output
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single tone gliding from `from` to `to` Hz
    fn sweep(ctx: &AudioContext, gain_level: f32, from: f32, to: f32, duration: f64) {
        let Some((osc, gain)) = create_osc(ctx, from, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(gain_level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + duration * 0.8)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
    }

    /// Notes played one after another, `step` seconds apart
    fn arpeggio(ctx: &AudioContext, gain_level: f32, notes: &[f32], step: f64, length: f64) {
        for (i, freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) else {
                continue;
            };
            let t = ctx.current_time() + i as f64 * step;
            gain.gain().set_value_at_time(gain_level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length * 0.8)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length).ok();
        }
    }
}
