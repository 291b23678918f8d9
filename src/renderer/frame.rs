//! Read-only frame snapshot
//!
//! Flattens the simulation into draw-ordered sprites plus HUD values so a
//! renderer never has to know about pools or tuning.

use glam::Vec2;
use serde::Serialize;

use crate::Settings;
use crate::sim::{EnemyVariant, GameOverSummary, GamePhase, PowerupKind, ScoreTracker, SimulationState};

/// Caps per sprite class, like fixed-size GPU buffers
pub const MAX_ENEMIES: usize = 128;
pub const MAX_LASERS: usize = 256;
pub const MAX_POWERUPS: usize = 16;

pub const PLAYER_COLOR: u32 = 0x7cff6b;
pub const PLAYER_LASER_COLOR: u32 = 0x00f6ff;
pub const ENEMY_LASER_COLOR: u32 = 0xff3864;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyVariant),
    /// Elite glow halo drawn under the enemy body
    EliteHalo,
    PlayerLaser,
    EnemyLaser,
    Particle,
    Powerup(PowerupKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
}

/// Values for the DOM or canvas HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub wave: u32,
    pub shield: f32,
    pub max_shield: f32,
    pub multiplier: u32,
    pub overdrive_charge: u32,
    pub overdrive_cap: u32,
    pub overdrive_ready: bool,
    /// Seconds of weapon buff left, 0 when inactive
    pub weapon_buff: f32,
}

impl Hud {
    /// Shield as a 0-1 fraction
    pub fn shield_fraction(&self) -> f32 {
        if self.max_shield <= 0.0 {
            0.0
        } else {
            (self.shield / self.max_shield).clamp(0.0, 1.0)
        }
    }

    pub fn overdrive_fraction(&self) -> f32 {
        (self.overdrive_charge as f32 / self.overdrive_cap.max(1) as f32).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Overlay {
    None,
    StartMenu,
    Paused,
    GameOver(GameOverSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    /// Simulated seconds, for renderer-side animation
    pub time: f32,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
    pub overlay: Overlay,
    /// Glow effects allowed
    pub glow: bool,
}

impl Frame {
    pub fn capture(state: &SimulationState, settings: &Settings) -> Self {
        let pools = &state.pools;
        let mut sprites = Vec::with_capacity(
            pools.particles.len() + pools.enemies.len() * 2 + pools.player_lasers.len() + 8,
        );

        let max_particles = settings.max_particles();
        for p in pools.particles.iter().filter(|p| !p.dead).take(max_particles) {
            let fade = if p.max_life > 0.0 {
                (p.life / p.max_life).clamp(0.0, 1.0)
            } else {
                0.0
            };
            sprites.push(Sprite {
                kind: SpriteKind::Particle,
                pos: p.pos,
                radius: p.size * (0.5 + 0.5 * fade),
                rotation: 0.0,
                color: p.color,
                alpha: fade,
            });
        }

        for p in pools.powerups.iter().filter(|p| !p.dead).take(MAX_POWERUPS) {
            sprites.push(Sprite {
                kind: SpriteKind::Powerup(p.kind),
                pos: p.pos,
                radius: p.radius,
                rotation: p.rotation,
                color: p.kind.color(),
                alpha: 1.0,
            });
        }

        for l in pools.enemy_lasers.iter().filter(|l| !l.dead).take(MAX_LASERS) {
            sprites.push(laser_sprite(SpriteKind::EnemyLaser, l.pos, l.vel, l.radius, ENEMY_LASER_COLOR));
        }

        for e in pools.enemies.iter().filter(|e| !e.dead).take(MAX_ENEMIES) {
            if e.elite {
                sprites.push(Sprite {
                    kind: SpriteKind::EliteHalo,
                    pos: e.pos,
                    radius: e.radius * 1.35,
                    rotation: 0.0,
                    color: e.palette.glow,
                    alpha: 0.5,
                });
            }
            // Wounded enemies dim toward half brightness
            let health = if e.max_hp > 0.0 { e.hp / e.max_hp } else { 0.0 };
            sprites.push(Sprite {
                kind: SpriteKind::Enemy(e.variant),
                pos: e.pos,
                radius: e.radius,
                rotation: e.age * 0.5,
                color: e.palette.core,
                alpha: 0.5 + 0.5 * health.clamp(0.0, 1.0),
            });
        }

        for l in pools.player_lasers.iter().filter(|l| !l.dead).take(MAX_LASERS) {
            sprites.push(laser_sprite(SpriteKind::PlayerLaser, l.pos, l.vel, l.radius, PLAYER_LASER_COLOR));
        }

        let player = &pools.player;
        if state.phase != GamePhase::Menu && !player.is_depleted() {
            // Blink while invulnerable
            let blink = player.is_invulnerable() && (state.time_ticks / 4) % 2 == 0;
            sprites.push(Sprite {
                kind: SpriteKind::Player,
                pos: player.pos,
                radius: player.radius,
                rotation: 0.0,
                color: PLAYER_COLOR,
                alpha: if blink { 0.35 } else { 1.0 },
            });
        }

        let tracker = &state.tracker;
        let hud = Hud {
            score: tracker.score,
            wave: state.director.wave,
            shield: player.shield.max(0.0),
            max_shield: player.max_shield,
            multiplier: tracker.multiplier,
            overdrive_charge: tracker.overdrive_charge,
            overdrive_cap: ScoreTracker::overdrive_cap(&state.tuning.scoring),
            overdrive_ready: tracker.overdrive_ready,
            weapon_buff: player.weapon_buff.max(0.0),
        };

        let overlay = match (state.phase, state.summary) {
            (GamePhase::Menu, _) => Overlay::StartMenu,
            (GamePhase::Paused, _) => Overlay::Paused,
            (GamePhase::GameOver, Some(summary)) => Overlay::GameOver(summary),
            (GamePhase::GameOver, None) => Overlay::GameOver(GameOverSummary {
                score: tracker.score,
                wave: state.director.wave,
            }),
            (GamePhase::Playing, _) => Overlay::None,
        };

        Self {
            width: state.tuning.arena.width,
            height: state.tuning.arena.height,
            time: state.elapsed,
            sprites,
            hud,
            overlay,
            glow: settings.effective_glow(),
        }
    }

    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind).count()
    }
}

/// Lasers are drawn as streaks along their velocity
fn laser_sprite(kind: SpriteKind, pos: Vec2, vel: Vec2, radius: f32, color: u32) -> Sprite {
    let rotation = if vel == Vec2::ZERO { 0.0 } else { vel.y.atan2(vel.x) };
    Sprite {
        kind,
        pos,
        radius,
        rotation,
        color,
        alpha: 1.0,
    }
}
