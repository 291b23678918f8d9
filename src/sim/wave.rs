//! Wave scheduling
//!
//! spawning -> clearing -> advancing -> spawning ... The director only keeps
//! counters; `run` turns its decisions into enemies and events.

use rand::Rng;
use std::f32::consts::TAU;

use super::effects::AudioCue;
use super::state::{Enemy, EnemyVariant, GameEvent, SimulationState};
use crate::probability;
use crate::tuning::{Tuning, WaveTuning};

/// What the director decided this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveStep {
    Idle,
    /// Release one enemy now
    Spawn,
    /// Wave cleared; the new wave number
    Advanced(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveDirector {
    /// 1-based
    pub wave: u32,
    pub enemies_to_spawn: u32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
}

impl WaveDirector {
    pub fn new(tuning: &WaveTuning) -> Self {
        Self {
            wave: 1,
            enemies_to_spawn: Self::pool_size(1, tuning),
            spawn_timer: tuning.breather,
            spawn_interval: tuning.initial_interval.max(tuning.min_interval),
        }
    }

    /// Enemies allotted to `wave`
    pub fn pool_size(wave: u32, tuning: &WaveTuning) -> u32 {
        tuning.initial_pool + wave.saturating_sub(1) * tuning.pool_growth
    }

    pub fn update(&mut self, dt: f32, live_enemies: usize, tuning: &WaveTuning) -> WaveStep {
        if self.enemies_to_spawn > 0 {
            self.spawn_timer -= dt;
            if self.spawn_timer <= 0.0 {
                self.enemies_to_spawn -= 1;
                self.spawn_timer = self.spawn_interval;
                return WaveStep::Spawn;
            }
            return WaveStep::Idle;
        }
        if live_enemies > 0 {
            return WaveStep::Idle;
        }

        self.wave += 1;
        self.enemies_to_spawn = Self::pool_size(self.wave, tuning);
        self.spawn_interval = (self.spawn_interval * tuning.interval_decay).max(tuning.min_interval);
        self.spawn_timer = tuning.breather;
        WaveStep::Advanced(self.wave)
    }
}

/// Weighted draw across the three tiers
pub fn roll_variant<R: Rng>(rng: &mut R, tuning: &Tuning) -> EnemyVariant {
    let weights = EnemyVariant::ALL.map(|v| tuning.enemies.get(v).weight.max(0.0));
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return EnemyVariant::Scout;
    }
    let mut roll = rng.random_range(0.0..total);
    for (variant, weight) in EnemyVariant::ALL.into_iter().zip(weights) {
        if roll < weight {
            return variant;
        }
        roll -= weight;
    }
    EnemyVariant::Scout
}

/// Advance the director and act on its decision
pub fn run(state: &mut SimulationState, dt: f32) {
    let live = state.pools.live_enemies();
    match state.director.update(dt, live, &state.tuning.waves) {
        WaveStep::Idle => {}
        WaveStep::Spawn => spawn_enemy(state),
        WaveStep::Advanced(wave) => {
            log::info!(
                "Wave {} begins: {} enemies, interval {:.3}s",
                wave,
                state.director.enemies_to_spawn,
                state.director.spawn_interval
            );
            state.effects.cue(AudioCue::WaveAdvance);
            state.events.push(GameEvent::WaveStarted { wave });
        }
    }
}

fn spawn_enemy(state: &mut SimulationState) {
    let variant = roll_variant(&mut state.rng, &state.tuning);
    let elite = state.rng.random_bool(probability(state.tuning.waves.elite_chance));

    // Keep the whole oscillation inside the arena
    let margin = state.tuning.enemies.get(variant).radius * 1.5 + variant.pattern().amplitude();
    let width = state.tuning.arena.width;
    let anchor_x = if width > margin * 2.0 {
        state.rng.random_range(margin..width - margin)
    } else {
        width * 0.5
    };
    let phase = state.rng.random_range(0.0..TAU);
    let first_shot = state.rng.random_range(0.2f32..=1.0);

    let id = state.next_entity_id();
    let enemy = Enemy::spawn(
        id,
        variant,
        state.director.wave,
        elite,
        anchor_x,
        phase,
        first_shot,
        &state.tuning,
    );
    log::debug!("Spawned {:?}{} #{} at x={:.0}", variant, if elite { " (elite)" } else { "" }, id, anchor_x);
    state.pools.enemies.push(enemy);
}
