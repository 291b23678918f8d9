//! Audio output
//!
//! The simulation only queues cues; a sink turns each cue's tone request into
//! sound. In the browser that is a Web Audio oscillator with a gain envelope,
//! no external files needed. Everywhere else the silent sink drops them.

use crate::sim::{AudioCue, ToneRequest};

/// Quietest gain an envelope ramps down to; exponential ramps can't hit zero
const GAIN_FLOOR: f32 = 0.01;
/// Oscillators stop a little after the envelope to avoid clicks
const STOP_TAIL: f32 = 0.05;

/// Consumer of tone bursts
pub trait AudioSink {
    fn play(&mut self, tone: &ToneRequest);

    /// Overall output level, 0-1
    fn set_volume(&mut self, _volume: f32) {}

    /// Browsers need a user gesture before audio can start
    fn resume(&mut self) {}
}

/// Drops every tone
#[derive(Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _tone: &ToneRequest) {}
}

/// Play every queued cue, in order
pub fn play_cues(sink: &mut dyn AudioSink, cues: &[AudioCue]) {
    for cue in cues {
        sink.play(&cue.tone());
    }
}

/// Timing and levels for one oscillator, relative to its start time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f32,
    pub release_at: f32,
    pub stop_at: f32,
    /// (target Hz, reached at)
    pub sweep: Option<(f32, f32)>,
}

impl Envelope {
    /// None when the tone would be inaudible or malformed
    pub fn for_tone(tone: &ToneRequest, volume: f32) -> Option<Self> {
        let peak = tone.gain.clamp(0.0, 1.0) * volume.clamp(0.0, 1.0);
        if peak <= GAIN_FLOOR || tone.duration <= 0.0 || tone.frequency <= 0.0 {
            return None;
        }
        let release_at = tone.duration;
        Some(Self {
            peak,
            release_at,
            stop_at: release_at + STOP_TAIL,
            // exponential ramps need a positive target
            sweep: tone.sweep_to.filter(|f| *f > 0.0).map(|f| (f, release_at)),
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioSink, Envelope, GAIN_FLOOR};
    use crate::sim::{ToneRequest, Waveform};
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    /// Web Audio oscillator sink
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudioSink {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

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

    fn osc_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }

    impl AudioSink for WebAudioSink {
        fn play(&mut self, tone: &ToneRequest) {
            let Some(env) = Envelope::for_tone(tone, self.volume) else {
                return;
            };
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = Self::create_osc(ctx, tone.frequency, osc_type(tone.waveform))
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(env.peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(GAIN_FLOOR, t + env.release_at as f64)
                .ok();
            if let Some((target, at)) = env.sweep {
                osc.frequency().set_value_at_time(tone.frequency, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, t + at as f64)
                    .ok();
            }

            osc.start().ok();
            osc.stop_with_when(t + env.stop_at as f64).ok();
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        tones: Vec<ToneRequest>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, tone: &ToneRequest) {
            self.tones.push(*tone);
        }
    }

    #[test]
    fn test_play_cues_in_order() {
        let mut sink = Recorder::default();
        play_cues(&mut sink, &[AudioCue::Fire, AudioCue::Explosion]);
        assert_eq!(sink.tones, vec![AudioCue::Fire.tone(), AudioCue::Explosion.tone()]);

        let mut silent = SilentSink;
        play_cues(&mut silent, &[AudioCue::GameOver]);
    }

    #[test]
    fn test_envelope_scales_by_volume() {
        let tone = AudioCue::Explosion.tone();
        let full = Envelope::for_tone(&tone, 1.0).unwrap();
        let half = Envelope::for_tone(&tone, 0.5).unwrap();
        assert!((half.peak - full.peak * 0.5).abs() < 1e-6);
        assert!(full.stop_at > full.release_at);
        assert_eq!(full.sweep.map(|(_, at)| at), Some(tone.duration));
    }

    #[test]
    fn test_muted_or_bad_tones_are_skipped() {
        let tone = AudioCue::Fire.tone();
        assert!(Envelope::for_tone(&tone, 0.0).is_none());

        let mut broken = tone;
        broken.duration = 0.0;
        assert!(Envelope::for_tone(&broken, 1.0).is_none());

        let mut flat = tone;
        flat.sweep_to = Some(0.0);
        assert_eq!(Envelope::for_tone(&flat, 1.0).unwrap().sweep, None);
    }
}
