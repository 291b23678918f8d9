//! Data-driven game balance
//!
//! Every number the simulation uses to decide gameplay lives here so balance
//! passes can happen in JSON without touching the tick code. Missing fields
//! fall back to the reference tuning.

use serde::{Deserialize, Serialize};

use crate::sim::EnemyVariant;

/// Playfield bounds (origin top-left, y grows downward)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    /// Largest delta (seconds) a single frame may advance
    pub max_delta: f32,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            max_delta: crate::consts::MAX_FRAME_DELTA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub speed: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    /// Must outlast `dash_duration`
    pub dash_invulnerability: f32,
    /// Counted from the moment the dash triggers
    pub dash_cooldown: f32,
    pub max_shield: f32,
    /// Grace window after a laser or body hit
    pub hit_invulnerability: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 16.0,
            speed: 300.0,
            dash_speed: 780.0,
            dash_duration: 0.16,
            dash_invulnerability: 0.3,
            dash_cooldown: 0.9,
            max_shield: 100.0,
            hit_invulnerability: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub fire_cooldown: f32,
    pub laser_speed: f32,
    pub laser_damage: f32,
    pub laser_radius: f32,
    pub laser_ttl: f32,
    pub buffed_fire_cooldown: f32,
    pub buffed_speed: f32,
    pub buffed_damage: f32,
    pub buffed_bolts: u32,
    /// Angle between neighbouring bolts (radians)
    pub buffed_spread: f32,
    pub buff_duration: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            fire_cooldown: 0.2,
            laser_speed: 620.0,
            laser_damage: 20.0,
            laser_radius: 4.0,
            laser_ttl: 1.2,
            buffed_fire_cooldown: 0.11,
            buffed_speed: 780.0,
            buffed_damage: 26.0,
            buffed_bolts: 3,
            buffed_spread: 0.16,
            buff_duration: 8.0,
        }
    }
}

/// Base (wave 0) stats for one enemy tier
///
/// A tier given in JSON must be complete; only whole tiers fall back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTuning {
    /// Relative weight in the spawn draw
    pub weight: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub radius: f32,
    /// Seconds between shots; `None` for tiers that never shoot
    pub fire_interval: Option<f32>,
    pub laser_damage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRoster {
    pub scout: EnemyTuning,
    pub slinger: EnemyTuning,
    pub brute: EnemyTuning,
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self {
            scout: EnemyTuning {
                weight: 60.0,
                max_hp: 40.0,
                speed: 70.0,
                radius: 16.0,
                fire_interval: None,
                laser_damage: 0.0,
            },
            slinger: EnemyTuning {
                weight: 28.0,
                max_hp: 60.0,
                speed: 55.0,
                radius: 18.0,
                fire_interval: Some(1.8),
                laser_damage: 12.0,
            },
            brute: EnemyTuning {
                weight: 12.0,
                max_hp: 140.0,
                speed: 35.0,
                radius: 26.0,
                fire_interval: Some(2.6),
                laser_damage: 18.0,
            },
        }
    }
}

impl EnemyRoster {
    pub fn get(&self, variant: EnemyVariant) -> &EnemyTuning {
        match variant {
            EnemyVariant::Scout => &self.scout,
            EnemyVariant::Slinger => &self.slinger,
            EnemyVariant::Brute => &self.brute,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub initial_pool: u32,
    pub pool_growth: u32,
    pub initial_interval: f32,
    /// Multiplier applied to the spawn interval on every wave advance
    pub interval_decay: f32,
    pub min_interval: f32,
    /// Per-wave stat growth: factor = 1 + stat_scale * wave
    pub stat_scale: f32,
    /// Delay before the first spawn of a new wave
    pub breather: f32,
    pub elite_chance: f64,
    pub elite_hp_scale: f32,
    pub elite_radius_scale: f32,
    pub elite_fire_scale: f32,
    pub enemy_laser_speed: f32,
    pub enemy_laser_radius: f32,
    pub enemy_laser_ttl: f32,
    pub contact_damage: f32,
    pub escape_damage: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            initial_pool: 8,
            pool_growth: 3,
            initial_interval: 1.2,
            interval_decay: 0.95,
            min_interval: 0.35,
            stat_scale: 0.12,
            breather: 1.6,
            elite_chance: 0.1,
            elite_hp_scale: 1.75,
            elite_radius_scale: 1.2,
            elite_fire_scale: 0.75,
            enemy_laser_speed: 230.0,
            enemy_laser_radius: 5.0,
            enemy_laser_ttl: 4.0,
            contact_damage: 22.0,
            escape_damage: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    pub base: f32,
    pub hp_factor: f32,
    pub wave_factor: f32,
    pub max_multiplier: u32,
    /// Seconds a multiplier step survives without another kill
    pub multiplier_window: f32,
    pub overdrive_cap: u32,
    pub charge_per_kill: u32,
    pub charge_per_elite: u32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            base: 90.0,
            hp_factor: 3.0,
            wave_factor: 12.0,
            max_multiplier: 15,
            multiplier_window: 2.4,
            overdrive_cap: 12,
            charge_per_kill: 1,
            charge_per_elite: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub drop_chance: f64,
    pub shield_amount: f32,
    pub fall_speed: f32,
    pub radius: f32,
    /// Radians per second
    pub spin: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            drop_chance: 0.4,
            shield_amount: 25.0,
            fall_speed: 90.0,
            radius: 12.0,
            spin: 2.5,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub clock: ClockTuning,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub enemies: EnemyRoster,
    pub waves: WaveTuning,
    pub scoring: ScoreTuning,
    pub powerups: PowerupTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Stat multiplier for enemies spawned on `wave`
    pub fn wave_factor(&self, wave: u32) -> f32 {
        1.0 + self.waves.stat_scale * wave as f32
    }
}
