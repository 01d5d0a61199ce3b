//! Audio cues
//!
//! The simulation only names *what* happened (`SoundEffect`); this module
//! turns a cue into oscillator parameters (`Tone`) and hands it to an
//! `AudioSink`. On the web the sink drives the Web Audio API; natively the
//! default sink is silent.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Enemy destroyed
    EnemyKill,
    /// Player lost a life
    PlayerHit,
    /// Laser intercepted one or more enemy shots
    LaserIntercept,
    /// Radial ability fired
    Radial,
    /// Cone ability fired
    Cone,
    /// Pickup stack activated a power-up
    StackActivate,
    /// Bomb pickup detonated
    Bomb,
    /// Boss entered the arena
    BossSpawn,
    /// Boss destroyed
    BossDeath,
    /// Wave concluded
    WaveClear,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Parameters of a single synthesized beep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub freq: f32,
    /// Optional linear pitch sweep target
    pub freq_end: Option<f32>,
    pub waveform: Waveform,
    pub duration: f32,
    pub gain: f32,
    pub attack: f32,
    pub release: f32,
}

impl SoundEffect {
    /// Tone used to voice this cue
    pub fn tone(self) -> Tone {
        let (freq, freq_end, waveform, duration, gain, attack, release) = match self {
            SoundEffect::EnemyKill => (500.0, 350.0, Waveform::Triangle, 0.06, 0.03, 0.003, 0.05),
            SoundEffect::PlayerHit => (220.0, 110.0, Waveform::Square, 0.12, 0.04, 0.002, 0.08),
            SoundEffect::LaserIntercept => (1100.0, 900.0, Waveform::Sine, 0.04, 0.02, 0.001, 0.03),
            SoundEffect::Radial => (540.0, 400.0, Waveform::Triangle, 0.09, 0.035, 0.004, 0.05),
            SoundEffect::Cone => (820.0, 720.0, Waveform::Sawtooth, 0.07, 0.03, 0.002, 0.04),
            SoundEffect::StackActivate => (660.0, 560.0, Waveform::Sine, 0.08, 0.03, 0.002, 0.05),
            SoundEffect::Bomb => (180.0, 120.0, Waveform::Sine, 0.18, 0.045, 0.004, 0.12),
            SoundEffect::BossSpawn => (360.0, 220.0, Waveform::Sawtooth, 0.25, 0.045, 0.01, 0.2),
            SoundEffect::BossDeath => (520.0, 260.0, Waveform::Triangle, 0.22, 0.045, 0.004, 0.12),
            SoundEffect::WaveClear => (440.0, 660.0, Waveform::Sine, 0.15, 0.03, 0.004, 0.1),
        };
        Tone {
            freq,
            freq_end: Some(freq_end),
            waveform,
            duration,
            gain,
            attack,
            release,
        }
    }
}

/// Anything that can voice a tone
pub trait AudioSink {
    fn play_tone(&mut self, tone: &Tone);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn play_tone(&mut self, tone: &Tone) {
        (**self).play_tone(tone);
    }
}

/// Silent sink (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play_tone(&mut self, _tone: &Tone) {}
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.master_volume <= 0.0 {
            return;
        }
        let mut tone = effect.tone();
        tone.gain *= self.master_volume;
        self.sink.play_tone(&tone);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Tone, Waveform};

    /// Web Audio API sink
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Create an oscillator routed through a gain node
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
    }

    impl AudioSink for WebAudioSink {
        fn play_tone(&mut self, tone: &Tone) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = Self::create_osc(ctx, tone.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let attack = f64::from(tone.attack);
            let duration = f64::from(tone.duration);
            let release = f64::from(tone.release);

            gain.gain().set_value_at_time(0.0001, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(tone.gain, t + attack)
                .ok();
            gain.gain()
                .set_target_at_time(0.0001, t + duration, release)
                .ok();
            if let Some(end) = tone.freq_end {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency()
                    .linear_ramp_to_value_at_time(end, t + duration)
                    .ok();
            }

            osc.start().ok();
            osc.stop_with_when(t + duration + release * 2.0).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Tone>);

    impl AudioSink for Recorder {
        fn play_tone(&mut self, tone: &Tone) {
            self.0.push(*tone);
        }
    }

    #[test]
    fn test_mute_gates_playback() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.play(SoundEffect::EnemyKill);
        audio.set_muted(true);
        audio.play(SoundEffect::BossDeath);
        assert_eq!(audio.sink().0.len(), 1);
        assert_eq!(audio.sink().0[0].freq, 500.0);
    }

    #[test]
    fn test_master_volume_scales_gain() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.play(SoundEffect::Bomb);
        let tone = audio.sink().0[0];
        assert!((tone.gain - 0.0225).abs() < 1e-6);
        assert_eq!(tone.freq_end, Some(120.0));
    }
}
