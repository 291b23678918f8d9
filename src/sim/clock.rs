//! Frame clock with a clamped delta
//!
//! The host hands in its frame timestamp (milliseconds, e.g. the
//! `requestAnimationFrame` argument). A tab that was hidden for ten seconds
//! produces one ordinary step on return, never a ten second catch-up.

#[derive(Debug, Clone)]
pub struct SimulationClock {
    max_delta: f32,
    last_ms: Option<f64>,
}

impl SimulationClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            max_delta: max_delta.max(0.0),
            last_ms: None,
        }
    }

    /// Seconds to simulate for the frame stamped `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, self.max_delta)
    }

    /// Forget the previous timestamp (after unpause or the tab becoming visible)
    pub fn resume(&mut self) {
        self.last_ms = None;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(crate::consts::MAX_FRAME_DELTA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(1234.0), 0.0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = SimulationClock::default();
        clock.advance(0.0);
        let dt = clock.advance(16.0);
        assert!((dt - 0.016).abs() < 1e-6);
        // tab suspended for five seconds
        assert_eq!(clock.advance(5016.0), 0.035);
    }

    #[test]
    fn test_backwards_time_yields_zero() {
        let mut clock = SimulationClock::default();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
    }

    #[test]
    fn test_resume_restarts_timeline() {
        let mut clock = SimulationClock::default();
        clock.advance(0.0);
        clock.advance(16.0);
        clock.resume();
        assert_eq!(clock.advance(90_000.0), 0.0);
        assert!(clock.advance(90_010.0) > 0.0);
    }
}
