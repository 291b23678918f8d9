//! Cosmetic side effects: particle bursts and audio cue requests
//!
//! The emitter only ever writes. It owns a separate RNG stream so that the
//! number of particles spawned can never shift a gameplay roll.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Particle;
use crate::consts::MAX_PARTICLES;
use crate::from_angle;

/// Particle burst shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Laser impact on an enemy or the player
    Hit,
    /// Trail puff behind a dashing player
    Dash,
    /// Flash at a gun barrel
    Muzzle,
    Explosion,
    /// Elite kills, overdrive and game over
    BigExplosion,
}

struct BurstStyle {
    count: usize,
    speed: (f32, f32),
    life: (f32, f32),
    size: (f32, f32),
    /// Half-angle of the emission cone around `heading`; PI = full circle
    cone: f32,
    heading: f32,
}

impl Burst {
    fn style(self) -> BurstStyle {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Burst::Hit => BurstStyle {
                count: 6,
                speed: (60.0, 180.0),
                life: (0.15, 0.3),
                size: (1.5, 3.0),
                cone: PI,
                heading: 0.0,
            },
            Burst::Dash => BurstStyle {
                count: 10,
                speed: (20.0, 90.0),
                life: (0.2, 0.4),
                size: (2.0, 4.0),
                cone: PI,
                heading: 0.0,
            },
            Burst::Muzzle => BurstStyle {
                count: 3,
                speed: (40.0, 120.0),
                life: (0.06, 0.14),
                size: (1.5, 2.5),
                cone: 0.5,
                heading: -FRAC_PI_2,
            },
            Burst::Explosion => BurstStyle {
                count: 18,
                speed: (80.0, 260.0),
                life: (0.3, 0.7),
                size: (2.0, 4.5),
                cone: PI,
                heading: 0.0,
            },
            Burst::BigExplosion => BurstStyle {
                count: 42,
                speed: (120.0, 420.0),
                life: (0.5, 1.2),
                size: (2.5, 6.0),
                cone: PI,
                heading: 0.0,
            },
        }
    }
}

/// Oscillator shape for a tone burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One parameterized tone burst for the audio sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneRequest {
    /// Start frequency (Hz)
    pub frequency: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Frequency reached at the end of the burst (Hz), if it sweeps
    pub sweep_to: Option<f32>,
    /// Peak gain before master/sfx volume, 0-1
    pub gain: f32,
}

/// Gameplay moments that have a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Fire,
    Hit,
    Explosion,
    Dash,
    Pickup,
    WaveAdvance,
    OverdriveReady,
    OverdriveTrigger,
    GameOver,
}

impl AudioCue {
    pub fn tone(self) -> ToneRequest {
        let (frequency, waveform, duration, sweep_to, gain) = match self {
            AudioCue::Fire => (880.0, Waveform::Square, 0.08, Some(440.0), 0.12),
            AudioCue::Hit => (220.0, Waveform::Sawtooth, 0.1, Some(110.0), 0.2),
            AudioCue::Explosion => (160.0, Waveform::Sawtooth, 0.35, Some(40.0), 0.35),
            AudioCue::Dash => (300.0, Waveform::Triangle, 0.15, Some(900.0), 0.2),
            AudioCue::Pickup => (660.0, Waveform::Sine, 0.2, Some(1320.0), 0.3),
            AudioCue::WaveAdvance => (392.0, Waveform::Square, 0.45, Some(784.0), 0.25),
            AudioCue::OverdriveReady => (523.0, Waveform::Triangle, 0.5, Some(1046.0), 0.3),
            AudioCue::OverdriveTrigger => (90.0, Waveform::Sawtooth, 0.9, Some(30.0), 0.45),
            AudioCue::GameOver => (330.0, Waveform::Square, 1.2, Some(55.0), 0.35),
        };
        ToneRequest {
            frequency,
            waveform,
            duration,
            sweep_to,
            gain,
        }
    }
}

/// Writes particles into a pool and queues cues for the host to drain
#[derive(Debug, Clone)]
pub struct EffectsEmitter {
    rng: Pcg32,
    max_particles: usize,
    cues: Vec<AudioCue>,
}

impl EffectsEmitter {
    pub fn new(seed: u64) -> Self {
        Self {
            // Distinct stream from the gameplay RNG
            rng: Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            max_particles: MAX_PARTICLES,
            cues: Vec::new(),
        }
    }

    /// Cap live particles; 0 disables bursts entirely
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max.min(MAX_PARTICLES);
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn burst(&mut self, particles: &mut Vec<Particle>, burst: Burst, pos: Vec2, color: u32) {
        let style = burst.style();
        let room = self.max_particles.saturating_sub(particles.len());
        for _ in 0..style.count.min(room) {
            let angle = style.heading + self.rng.random_range(-style.cone..=style.cone);
            let speed = self.rng.random_range(style.speed.0..=style.speed.1);
            let life = self.rng.random_range(style.life.0..=style.life.1);
            particles.push(Particle {
                pos,
                vel: from_angle(angle, speed),
                life,
                max_life: life,
                size: self.rng.random_range(style.size.0..=style.size.1),
                color,
                dead: false,
            });
        }
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    pub fn pending_cues(&self) -> &[AudioCue] {
        &self.cues
    }

    /// Hand queued cues to the host (fire-and-forget)
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }
}
