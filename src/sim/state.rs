//! Simulation state and entity types
//!
//! Everything a tick reads or writes lives in `SimulationState`, so several
//! independent runs can coexist and tests can build exact scenarios.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{AudioCue, Burst, EffectsEmitter};
use super::score::ScoreTracker;
use super::wave::WaveDirector;
use crate::probability;
use crate::tuning::{EnemyTuning, Tuning};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start menu, nothing simulated yet
    Menu,
    Playing,
    /// Frozen; the last frame stays on screen under the pause banner
    Paused,
    /// Shield depleted
    GameOver,
}

/// Enemy tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    Scout,
    Slinger,
    Brute,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 3] = [
        EnemyVariant::Scout,
        EnemyVariant::Slinger,
        EnemyVariant::Brute,
    ];

    pub fn pattern(self) -> MovementPattern {
        match self {
            EnemyVariant::Scout => MovementPattern::Weave,
            EnemyVariant::Slinger => MovementPattern::Sweep,
            EnemyVariant::Brute => MovementPattern::Drift,
        }
    }

    pub fn palette(self, elite: bool) -> Palette {
        let core = match self {
            EnemyVariant::Scout => 0x00f6ff,
            EnemyVariant::Slinger => 0xff2bd6,
            EnemyVariant::Brute => 0xffa63d,
        };
        // Elites keep their tier colour inside a gold halo
        let glow = if elite { 0xfff35c } else { core };
        Palette { core, glow }
    }
}

/// Horizontal motion laid over the constant fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Narrow, quick side-to-side
    Weave,
    /// Wide slow sweep across the lane
    Sweep,
    /// Barely perceptible wander
    Drift,
}

impl MovementPattern {
    pub fn amplitude(self) -> f32 {
        match self {
            MovementPattern::Weave => 38.0,
            MovementPattern::Sweep => 140.0,
            MovementPattern::Drift => 22.0,
        }
    }

    /// Radians per second
    pub fn frequency(self) -> f32 {
        match self {
            MovementPattern::Weave => 3.2,
            MovementPattern::Sweep => 1.1,
            MovementPattern::Drift => 0.7,
        }
    }

    /// Closed-form offset from the spawn anchor
    pub fn lateral_offset(self, age: f32, phase: f32) -> f32 {
        self.amplitude() * (age * self.frequency() + phase).sin()
    }
}

/// Two-tone colour scheme (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub core: u32,
    pub glow: u32,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Seconds of dash remaining
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    pub dash_dir: Vec2,
    /// Seconds of invulnerability remaining
    pub invulnerable: f32,
    pub fire_cooldown: f32,
    pub shield: f32,
    pub max_shield: f32,
    /// Seconds of weapon buff remaining
    pub weapon_buff: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.arena.width * 0.5, tuning.arena.height - 60.0),
            radius: tuning.player.radius,
            speed: tuning.player.speed,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            dash_dir: Vec2::NEG_Y,
            invulnerable: 0.0,
            fire_cooldown: 0.0,
            shield: tuning.player.max_shield,
            max_shield: tuning.player.max_shield,
            weapon_buff: 0.0,
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_timer > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    pub fn is_buffed(&self) -> bool {
        self.weapon_buff > 0.0
    }

    pub fn is_depleted(&self) -> bool {
        self.shield <= 0.0
    }

    /// Clamped shield change; returns the applied delta
    pub fn adjust_shield(&mut self, delta: f32) -> f32 {
        let before = self.shield;
        self.shield = (self.shield + delta).clamp(0.0, self.max_shield);
        self.shield - before
    }
}

/// Gun carried by shooting tiers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyGun {
    pub timer: f32,
    pub interval: f32,
    pub damage: f32,
    pub projectile_speed: f32,
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub variant: EnemyVariant,
    pub pattern: MovementPattern,
    pub pos: Vec2,
    /// Lane centre the pattern oscillates around
    pub anchor_x: f32,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    /// Seconds since spawn
    pub age: f32,
    pub phase: f32,
    pub gun: Option<EnemyGun>,
    pub palette: Palette,
    pub elite: bool,
    pub dead: bool,
}

impl Enemy {
    /// Build an enemy with wave-scaled stats. Random inputs (lane, phase,
    /// first shot delay as a 0-1 fraction) are rolled by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        id: u32,
        variant: EnemyVariant,
        wave: u32,
        elite: bool,
        anchor_x: f32,
        phase: f32,
        first_shot: f32,
        tuning: &Tuning,
    ) -> Self {
        let base: &EnemyTuning = tuning.enemies.get(variant);
        let factor = tuning.wave_factor(wave);
        let waves = &tuning.waves;

        let mut max_hp = base.max_hp * factor;
        let mut radius = base.radius;
        let mut fire_scale = 1.0;
        if elite {
            max_hp *= waves.elite_hp_scale;
            radius *= waves.elite_radius_scale;
            fire_scale = waves.elite_fire_scale;
        }
        let max_hp = max_hp.max(1.0);

        let gun = base.fire_interval.map(|interval| {
            let interval = (interval / factor * fire_scale).max(0.1);
            EnemyGun {
                timer: interval * first_shot.clamp(0.2, 1.0),
                interval,
                damage: base.laser_damage,
                projectile_speed: waves.enemy_laser_speed * factor,
            }
        });

        let pattern = variant.pattern();
        Self {
            id,
            variant,
            pattern,
            pos: Vec2::new(anchor_x + pattern.lateral_offset(0.0, phase), -radius),
            anchor_x,
            radius: radius.max(1.0),
            hp: max_hp,
            max_hp,
            speed: base.speed * factor,
            age: 0.0,
            phase,
            gun,
            palette: variant.palette(elite),
            elite,
            dead: false,
        }
    }

    pub fn shoots(&self) -> bool {
        self.gun.is_some()
    }
}

/// A projectile; ownership is the pool it lives in
#[derive(Debug, Clone)]
pub struct Laser {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub ttl: f32,
    pub dead: bool,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: u32,
    pub dead: bool,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Shield,
    WeaponBuff,
}

impl PowerupKind {
    pub fn color(self) -> u32 {
        match self {
            PowerupKind::Shield => 0x4dd2ff,
            PowerupKind::WeaponBuff => 0xff9f1c,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub fall_speed: f32,
    pub rotation: f32,
    pub radius: f32,
    pub dead: bool,
}

/// Mutable entity collections, owned by the tick
#[derive(Debug, Clone)]
pub struct EntityPools {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_lasers: Vec<Laser>,
    pub enemy_lasers: Vec<Laser>,
    pub particles: Vec<Particle>,
    pub powerups: Vec<Powerup>,
}

impl EntityPools {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: Player::new(tuning),
            enemies: Vec::new(),
            player_lasers: Vec::new(),
            enemy_lasers: Vec::new(),
            particles: Vec::new(),
            powerups: Vec::new(),
        }
    }

    /// Enemies not yet marked dead
    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.dead).count()
    }

    /// End-of-tick sweep; the only place entities leave the pools
    pub fn purge_dead(&mut self) {
        self.enemies.retain(|e| !e.dead);
        self.player_lasers.retain(|l| !l.dead);
        self.enemy_lasers.retain(|l| !l.dead);
        self.particles.retain(|p| !p.dead);
        self.powerups.retain(|p| !p.dead);
    }
}

/// How an enemy died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    /// Shot down by a player laser
    Laser,
    /// Wiped by an overdrive blast
    Overdrive,
    /// Rammed the player
    Contact,
}

impl KillCause {
    pub fn awards_score(self) -> bool {
        match self {
            KillCause::Laser | KillCause::Overdrive => true,
            KillCause::Contact => false,
        }
    }

    /// Overdrive kills must not refill the meter that fired them
    pub fn accrues_charge(self) -> bool {
        match self {
            KillCause::Laser => true,
            KillCause::Overdrive | KillCause::Contact => false,
        }
    }
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    EnemyLaser,
    Contact,
    /// An enemy slipped past the bottom edge
    Escape,
}

impl DamageSource {
    pub fn respects_invulnerability(self) -> bool {
        match self {
            DamageSource::EnemyLaser | DamageSource::Contact => true,
            DamageSource::Escape => false,
        }
    }
}

/// Final tally shown on the game-over panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub wave: u32,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    WaveStarted { wave: u32 },
    EnemyKilled { id: u32, variant: EnemyVariant, elite: bool, cause: KillCause, award: u64 },
    EnemyEscaped { id: u32 },
    PlayerHit { source: DamageSource, damage: f32, shield: f32 },
    PowerupDropped { id: u32, kind: PowerupKind },
    PowerupCollected { id: u32, kind: PowerupKind },
    OverdriveReady,
    OverdriveTriggered { kills: u32 },
    GameOver(GameOverSummary),
}

/// Dead enemy awaiting its score/drop/effects settlement
#[derive(Debug, Clone, Copy)]
pub(crate) struct Kill {
    pub id: u32,
    pub variant: EnemyVariant,
    pub elite: bool,
    pub max_hp: f32,
    pub pos: Vec2,
    pub color: u32,
    pub cause: KillCause,
}

impl Kill {
    pub fn of(enemy: &Enemy, cause: KillCause) -> Self {
        Self {
            id: enemy.id,
            variant: enemy.variant,
            elite: enemy.elite,
            max_hp: enemy.max_hp,
            pos: enemy.pos,
            color: enemy.palette.glow,
            cause,
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Gameplay RNG (spawn rolls, elite rolls, drops)
    pub rng: Pcg32,
    /// Simulated seconds in the current run
    pub elapsed: f32,
    pub time_ticks: u64,
    pub pools: EntityPools,
    pub tracker: ScoreTracker,
    pub director: WaveDirector,
    pub effects: EffectsEmitter,
    /// Drained by the host each frame
    pub events: Vec<GameEvent>,
    pub summary: Option<GameOverSummary>,
    next_id: u32,
}

impl SimulationState {
    /// Create a state sitting on the start menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            elapsed: 0.0,
            time_ticks: 0,
            pools: EntityPools::new(&tuning),
            tracker: ScoreTracker::new(),
            director: WaveDirector::new(&tuning.waves),
            effects: EffectsEmitter::new(seed),
            events: Vec::new(),
            summary: None,
            next_id: 1,
            tuning,
        }
    }

    /// Playing or paused
    pub fn running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    pub fn paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Begin a fresh run. The RNG keeps advancing so back-to-back runs differ.
    pub fn start(&mut self) {
        self.pools = EntityPools::new(&self.tuning);
        self.tracker = ScoreTracker::new();
        self.director = WaveDirector::new(&self.tuning.waves);
        self.effects.drain_cues();
        self.summary = None;
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
        self.events.push(GameEvent::RunStarted { seed: self.seed });
        self.events.push(GameEvent::WaveStarted { wave: self.director.wave });
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an enemy at an explicit position with wave-scaled stats
    pub fn insert_enemy(&mut self, variant: EnemyVariant, elite: bool, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let wave = self.director.wave;
        let mut enemy = Enemy::spawn(id, variant, wave, elite, pos.x, 0.0, 1.0, &self.tuning);
        enemy.pos = pos;
        enemy.anchor_x = pos.x;
        self.pools.enemies.push(enemy);
        id
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply damage from `source`; returns whether it landed
    pub fn hurt_player(&mut self, amount: f32, source: DamageSource) -> bool {
        if !self.running() {
            return false;
        }
        let player = &mut self.pools.player;
        if player.is_depleted() {
            return false;
        }
        if source.respects_invulnerability() && player.is_invulnerable() {
            return false;
        }

        player.adjust_shield(-amount.max(0.0));
        if source.respects_invulnerability() {
            player.invulnerable = player.invulnerable.max(self.tuning.player.hit_invulnerability);
        }
        let shield = player.shield;
        let pos = player.pos;

        self.tracker.break_combo();
        self.effects.burst(&mut self.pools.particles, Burst::Hit, pos, 0xff3864);
        self.effects.cue(AudioCue::Hit);
        self.events.push(GameEvent::PlayerHit {
            source,
            damage: amount,
            shield,
        });

        if shield <= 0.0 {
            self.end_run();
        }
        true
    }

    /// Playing -> GameOver; a no-op once the run is over
    pub fn end_run(&mut self) {
        if !self.running() {
            return;
        }
        let summary = GameOverSummary {
            score: self.tracker.score,
            wave: self.director.wave,
        };
        self.phase = GamePhase::GameOver;
        self.summary = Some(summary);
        let pos = self.pools.player.pos;
        self.effects.burst(&mut self.pools.particles, Burst::BigExplosion, pos, 0x7cff6b);
        self.effects.cue(AudioCue::GameOver);
        self.events.push(GameEvent::GameOver(summary));
        log::info!("Game over: score {} on wave {}", summary.score, summary.wave);
    }

    /// Score, drop and explode a dead enemy
    pub(crate) fn settle_kill(&mut self, kill: Kill) {
        let mut award = 0;
        if kill.cause.awards_score() {
            let credit = self.tracker.award_kill(
                kill.max_hp,
                self.director.wave,
                kill.elite,
                kill.cause.accrues_charge(),
                &self.tuning.scoring,
            );
            award = credit.award;
            log::debug!("Enemy #{} +{} (now x{})", kill.id, award, credit.multiplier);
            if credit.became_ready {
                log::info!("Overdrive ready");
                self.effects.cue(AudioCue::OverdriveReady);
                self.events.push(GameEvent::OverdriveReady);
            }
        }
        self.events.push(GameEvent::EnemyKilled {
            id: kill.id,
            variant: kill.variant,
            elite: kill.elite,
            cause: kill.cause,
            award,
        });

        if kill.elite
            && kill.cause.awards_score()
            && self.rng.random_bool(probability(self.tuning.powerups.drop_chance))
        {
            self.drop_powerup(kill.pos);
        }

        let burst = if kill.elite { Burst::BigExplosion } else { Burst::Explosion };
        self.effects.burst(&mut self.pools.particles, burst, kill.pos, kill.color);
        self.effects.cue(AudioCue::Explosion);
    }

    fn drop_powerup(&mut self, pos: Vec2) {
        let kind = if self.rng.random_bool(0.5) {
            PowerupKind::Shield
        } else {
            PowerupKind::WeaponBuff
        };
        let id = self.next_entity_id();
        let tuning = &self.tuning.powerups;
        self.pools.powerups.push(Powerup {
            id,
            kind,
            pos,
            fall_speed: tuning.fall_speed,
            rotation: 0.0,
            radius: tuning.radius.max(1.0),
            dead: false,
        });
        self.events.push(GameEvent::PowerupDropped { id, kind });
    }

    /// Consume the overdrive meter and destroy every live enemy.
    /// Returns false (and does nothing) unless the meter is full.
    pub fn trigger_overdrive(&mut self) -> bool {
        if !self.running() || !self.tracker.take_overdrive() {
            return false;
        }

        let mut kills = Vec::new();
        for enemy in self.pools.enemies.iter_mut().filter(|e| !e.dead) {
            enemy.dead = true;
            kills.push(Kill::of(enemy, KillCause::Overdrive));
        }
        let count = kills.len() as u32;
        for kill in kills {
            self.settle_kill(kill);
        }

        let center = Vec2::new(self.tuning.arena.width * 0.5, self.tuning.arena.height * 0.5);
        self.effects.burst(&mut self.pools.particles, Burst::BigExplosion, center, 0xfff35c);
        self.effects.cue(AudioCue::OverdriveTrigger);
        self.events.push(GameEvent::OverdriveTriggered { kills: count });
        log::info!("Overdrive triggered: {} enemies cleared", count);
        true
    }
}
