//! Neon Raid - simulation core for a retro neon arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, scoring)
//! - `renderer`: Frame snapshots handed to an external renderer
//! - `audio`: Tone-burst sinks (Web Audio in the browser, silent elsewhere)
//! - `platform`: Browser key names to control intents
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest per-frame delta (seconds); longer gaps are dropped, not replayed
    pub const MAX_FRAME_DELTA: f32 = 0.035;

    /// Hard ceiling on live particles regardless of settings
    pub const MAX_PARTICLES: usize = 600;

    /// Lasers are culled once this far outside the arena
    pub const OFFSCREEN_MARGIN: f32 = 40.0;
}

/// Unit vector at `angle` (radians, 0 = +x, screen coordinates) scaled by `len`
#[inline]
pub fn from_angle(angle: f32, len: f32) -> Vec2 {
    Vec2::new(angle.cos() * len, angle.sin() * len)
}

/// Tuned chance as a valid probability; NaN and infinities read as never
#[inline]
pub fn probability(p: f64) -> f64 {
    if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_rejects_non_finite() {
        assert_eq!(probability(0.4), 0.4);
        assert_eq!(probability(-2.0), 0.0);
        assert_eq!(probability(7.0), 1.0);
        assert_eq!(probability(f64::NAN), 0.0);
        assert_eq!(probability(f64::INFINITY), 0.0);
        assert_eq!(probability(f64::NEG_INFINITY), 0.0);
    }
}
