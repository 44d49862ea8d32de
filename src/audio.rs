//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. The three
//! atlas clips (`music`, `repair`, `death`) are synthesised here as well.

use crate::assets::AudioClip;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Brick knocked out
    BrickBreak,
    /// One repair press landed
    RepairTick,
    /// Brick rebuilt
    RepairComplete,
    /// Ball launched
    Launch,
    /// Ball dropped out of play
    BallLost,
    /// Hero and bricks gone
    Death,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::WallHit(_) => Some(SoundEffect::WallHit),
            GameEvent::BrickDestroyed { .. } => Some(SoundEffect::BrickBreak),
            GameEvent::RepairProgress { progress, .. } if *progress < 1.0 => {
                Some(SoundEffect::RepairTick)
            }
            GameEvent::BrickRepaired { .. } => Some(SoundEffect::RepairComplete),
            GameEvent::BallLaunched => Some(SoundEffect::Launch),
            GameEvent::BallReset => Some(SoundEffect::BallLost),
            GameEvent::GameOver => Some(SoundEffect::Death),
            _ => None,
        }
    }

    /// Atlas clip this effect stands in for
    pub fn clip(&self) -> Option<AudioClip> {
        match self {
            SoundEffect::RepairTick | SoundEffect::RepairComplete => Some(AudioClip::Repair),
            SoundEffect::Death => Some(AudioClip::Death),
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
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        /// Running drone oscillators and their shared gain
        music: Option<(Vec<OscillatorNode>, GainNode)>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
                muted: false,
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if let Some((_, gain)) = &self.music {
                let level = if muted { 0.0 } else { self.music_volume * 0.15 };
                gain.gain().set_value(level);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.muted || self.sfx_volume <= 0.0 {
                return;
            }
            let vol = self.sfx_volume;

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            self.play_effect(ctx, effect, vol);
        }

        /// Start the background drone if it isn't running
        pub fn start_music(&mut self) {
            if self.music.is_some() || self.music_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            if gain.connect_with_audio_node(&ctx.destination()).is_err() {
                return;
            }
            let level = if self.muted { 0.0 } else { self.music_volume * 0.15 };
            gain.gain().set_value(level);

            // Root, fifth and octave, slightly detuned
            let mut voices = Vec::new();
            for freq in [110.0, 165.5, 220.8] {
                let Ok(osc) = ctx.create_oscillator() else {
                    continue;
                };
                osc.set_type(OscillatorType::Triangle);
                osc.frequency().set_value(freq);
                if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                    voices.push(osc);
                }
            }
            log::debug!("Music started ({} voices)", voices.len());
            self.music = Some((voices, gain));
        }

        pub fn stop_music(&mut self) {
            if let Some((voices, _)) = self.music.take() {
                for osc in voices {
                    osc.stop().ok();
                }
            }
        }

        // === Sound generators ===

        /// Play one enveloped tone, `delay` seconds from now
        fn tone(&self, ctx: &AudioContext, tone: Tone, vol: f32, delay: f64) {
            let Some(osc) = ctx.create_oscillator().ok() else {
                return;
            };
            let Some(gain) = ctx.create_gain().ok() else {
                return;
            };
            osc.set_type(tone.wave);
            osc.frequency().set_value(tone.freq);
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }

            let t = ctx.current_time() + delay;
            let end = t + tone.decay;
            gain.gain().set_value_at_time(vol * tone.level, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            if let Some(target) = tone.sweep_to {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.05).ok();
        }

        fn play_tones(&self, ctx: &AudioContext, tones: &[(Tone, f64)], vol: f32) {
            for &(tone, delay) in tones {
                self.tone(ctx, tone, vol, delay);
            }
        }

        fn play_effect(&self, ctx: &AudioContext, effect: SoundEffect, vol: f32) {
            use OscillatorType::{Sine, Square, Triangle};

            match effect {
                // Solid thump
                SoundEffect::PaddleHit => {
                    self.tone(ctx, Tone::new(150.0, Sine, 0.6, 0.1).sweep(60.0), vol, 0.0)
                }
                SoundEffect::WallHit => {
                    self.tone(ctx, Tone::new(400.0, Sine, 0.3, 0.08), vol, 0.0)
                }
                // Crunch over a thump
                SoundEffect::BrickBreak => self.play_tones(
                    ctx,
                    &[
                        (Tone::new(1400.0, Square, 0.2, 0.12).sweep(500.0), 0.0),
                        (Tone::new(90.0, Sine, 0.35, 0.1), 0.0),
                    ],
                    vol,
                ),
                // Hammer tap
                SoundEffect::RepairTick => {
                    self.tone(ctx, Tone::new(520.0, Triangle, 0.25, 0.05), vol, 0.0)
                }
                // Rising chime
                SoundEffect::RepairComplete => self.play_tones(
                    ctx,
                    &[
                        (Tone::new(600.0, Sine, 0.25, 0.15), 0.0),
                        (Tone::new(800.0, Sine, 0.25, 0.15), 0.08),
                        (Tone::new(1000.0, Sine, 0.25, 0.15), 0.16),
                    ],
                    vol,
                ),
                // Whoosh up
                SoundEffect::Launch => {
                    self.tone(ctx, Tone::new(200.0, Triangle, 0.3, 0.2).sweep(600.0), vol, 0.0)
                }
                // Falling whistle
                SoundEffect::BallLost => {
                    self.tone(ctx, Tone::new(500.0, Sine, 0.3, 0.5).sweep(80.0), vol, 0.0)
                }
                SoundEffect::Death => self.play_tones(
                    ctx,
                    &[
                        (Tone::new(400.0, Sine, 0.3, 0.3), 0.0),
                        (Tone::new(350.0, Sine, 0.3, 0.3), 0.2),
                        (Tone::new(300.0, Sine, 0.3, 0.3), 0.4),
                        (Tone::new(200.0, Sine, 0.3, 0.5).sweep(120.0), 0.6),
                    ],
                    vol,
                ),
            }
        }
    }

    /// One oscillator voice with an exponential decay
    #[derive(Clone, Copy)]
    struct Tone {
        freq: f32,
        wave: OscillatorType,
        /// Peak gain before the master volume
        level: f32,
        /// Seconds until the envelope has died away
        decay: f64,
        sweep_to: Option<f32>,
    }

    impl Tone {
        fn new(freq: f32, wave: OscillatorType, level: f32, decay: f64) -> Self {
            Self {
                freq,
                wave,
                level,
                decay,
                sweep_to: None,
            }
        }

        /// Glide the pitch to `freq` over the decay
        fn sweep(self, freq: f32) -> Self {
            Self {
                sweep_to: Some(freq),
                ..self
            }
        }
    }
}
