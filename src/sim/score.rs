//! Score, combo multiplier and the overdrive meter

use crate::tuning::ScoreTuning;

/// Hard ceiling on the multiplier whatever the tuning says
pub const MULTIPLIER_CEILING: u32 = 15;
/// Hard ceiling on the overdrive meter whatever the tuning says
pub const OVERDRIVE_CEILING: u32 = 12;

/// Result of crediting one kill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillCredit {
    pub award: u64,
    /// Multiplier after the kill
    pub multiplier: u32,
    /// This kill filled the overdrive meter
    pub became_ready: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTracker {
    pub score: u64,
    /// Always in [1, 15]
    pub multiplier: u32,
    /// Seconds until the multiplier drops a step; only armed above x1
    pub multiplier_timer: f32,
    pub overdrive_charge: u32,
    pub overdrive_ready: bool,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self {
            score: 0,
            multiplier: 1,
            multiplier_timer: 0.0,
            overdrive_charge: 0,
            overdrive_ready: false,
        }
    }

    fn max_multiplier(tuning: &ScoreTuning) -> u32 {
        tuning.max_multiplier.clamp(1, MULTIPLIER_CEILING)
    }

    /// Charge at which overdrive is ready, after clamping the tuned value
    pub fn overdrive_cap(tuning: &ScoreTuning) -> u32 {
        tuning.overdrive_cap.clamp(1, OVERDRIVE_CEILING)
    }

    /// Points an enemy is worth before the multiplier
    pub fn base_score(max_hp: f32, wave: u32, tuning: &ScoreTuning) -> u64 {
        let raw = tuning.base + max_hp * tuning.hp_factor + wave as f32 * tuning.wave_factor;
        raw.round().max(0.0) as u64
    }

    /// Credit a scoring kill. `accrue_charge` is false for kills that must not
    /// feed the overdrive meter.
    pub fn award_kill(
        &mut self,
        max_hp: f32,
        wave: u32,
        elite: bool,
        accrue_charge: bool,
        tuning: &ScoreTuning,
    ) -> KillCredit {
        self.multiplier = self.multiplier.max(1);
        let base = Self::base_score(max_hp, wave, tuning);
        let award = base.saturating_mul(self.multiplier as u64);
        self.score = self.score.saturating_add(award);

        self.multiplier = (self.multiplier + 1).min(Self::max_multiplier(tuning));
        if self.multiplier > 1 {
            self.multiplier_timer = tuning.multiplier_window;
        }

        let mut became_ready = false;
        if accrue_charge {
            let gain = if elite {
                tuning.charge_per_elite
            } else {
                tuning.charge_per_kill
            };
            let cap = Self::overdrive_cap(tuning);
            self.overdrive_charge = (self.overdrive_charge + gain).min(cap);
            if self.overdrive_charge >= cap && !self.overdrive_ready {
                self.overdrive_ready = true;
                became_ready = true;
            }
        }

        KillCredit {
            award,
            multiplier: self.multiplier,
            became_ready,
        }
    }

    /// Player took damage: the combo is gone, not decayed
    pub fn break_combo(&mut self) {
        self.multiplier = 1;
        self.multiplier_timer = 0.0;
    }

    /// Step the multiplier down one level per elapsed window
    pub fn decay(&mut self, dt: f32, tuning: &ScoreTuning) {
        if self.multiplier <= 1 {
            self.multiplier = 1;
            self.multiplier_timer = 0.0;
            return;
        }
        self.multiplier_timer -= dt;
        if self.multiplier_timer <= 0.0 {
            self.multiplier -= 1;
            self.multiplier_timer = if self.multiplier > 1 {
                tuning.multiplier_window
            } else {
                0.0
            };
        }
    }

    /// Empty a full meter. Returns false when it was not ready.
    pub fn take_overdrive(&mut self) -> bool {
        if !self.overdrive_ready {
            return false;
        }
        self.overdrive_ready = false;
        self.overdrive_charge = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scout_reference_award() {
        let tuning = ScoreTuning::default();
        let mut tracker = ScoreTracker::new();
        let credit = tracker.award_kill(40.0 * 1.12, 1, false, true, &tuning);
        assert_eq!(credit.award, 236);
        assert_eq!(tracker.score, 236);
        assert_eq!(tracker.multiplier, 2);
        assert_eq!(tracker.multiplier_timer, tuning.multiplier_window);
    }

    #[test]
    fn test_award_uses_multiplier_before_increment() {
        let tuning = ScoreTuning::default();
        let mut tracker = ScoreTracker::new();
        tracker.multiplier = 3;
        let credit = tracker.award_kill(40.0 * 1.12, 1, false, true, &tuning);
        assert_eq!(credit.award, 236 * 3);
        assert_eq!(credit.multiplier, 4);
    }

    #[test]
    fn test_multiplier_caps_at_fifteen() {
        let tuning = ScoreTuning {
            max_multiplier: 99,
            ..Default::default()
        };
        let mut tracker = ScoreTracker::new();
        for _ in 0..40 {
            tracker.award_kill(10.0, 1, false, false, &tuning);
        }
        assert_eq!(tracker.multiplier, MULTIPLIER_CEILING);
    }

    #[test]
    fn test_decay_steps_down_per_window() {
        let tuning = ScoreTuning::default();
        let mut tracker = ScoreTracker::new();
        tracker.award_kill(10.0, 1, false, false, &tuning);
        tracker.award_kill(10.0, 1, false, false, &tuning);
        assert_eq!(tracker.multiplier, 3);

        let window = tuning.multiplier_window;
        tracker.decay(window * 0.5, &tuning);
        assert_eq!(tracker.multiplier, 3);
        tracker.decay(window * 0.6, &tuning);
        assert_eq!(tracker.multiplier, 2);
        assert_eq!(tracker.multiplier_timer, window);
        tracker.decay(window + 0.01, &tuning);
        assert_eq!(tracker.multiplier, 1);
        assert_eq!(tracker.multiplier_timer, 0.0);
        tracker.decay(10.0, &tuning);
        assert_eq!(tracker.multiplier, 1);
    }

    #[test]
    fn test_break_combo_resets_immediately() {
        let tuning = ScoreTuning::default();
        let mut tracker = ScoreTracker::new();
        for _ in 0..5 {
            tracker.award_kill(10.0, 1, false, false, &tuning);
        }
        tracker.break_combo();
        assert_eq!(tracker.multiplier, 1);
        assert_eq!(tracker.multiplier_timer, 0.0);
    }

    #[test]
    fn test_charge_saturates_and_signals_once() {
        let tuning = ScoreTuning::default();
        let mut tracker = ScoreTracker::new();
        let mut signals = 0;
        // 3 elites (9) + 3 normals (12) + extras
        for elite in [true, true, true, false, false, false, false, true] {
            if tracker.award_kill(10.0, 1, elite, true, &tuning).became_ready {
                signals += 1;
            }
        }
        assert_eq!(signals, 1);
        assert_eq!(tracker.overdrive_charge, 12);
        assert!(tracker.overdrive_ready);
    }

    #[test]
    fn test_skip_charge_kills_leave_meter_alone() {
        let tuning = ScoreTuning::default();
        let mut tracker = ScoreTracker::new();
        tracker.overdrive_charge = 5;
        tracker.award_kill(10.0, 1, true, false, &tuning);
        assert_eq!(tracker.overdrive_charge, 5);
    }

    #[test]
    fn test_take_overdrive() {
        let mut tracker = ScoreTracker::new();
        assert!(!tracker.take_overdrive());
        tracker.overdrive_charge = 12;
        tracker.overdrive_ready = true;
        assert!(tracker.take_overdrive());
        assert_eq!(tracker.overdrive_charge, 0);
        assert!(!tracker.overdrive_ready);
    }
}
