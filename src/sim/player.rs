//! Player controller: movement, dash and firing

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::effects::{AudioCue, Burst};
use super::input::TickInput;
use super::state::{Laser, SimulationState};
use crate::from_angle;

const PLAYER_COLOR: u32 = 0x7cff6b;
const LASER_COLOR: u32 = 0x00f6ff;

/// Advance the player by one tick
pub fn update(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let player = &mut state.pools.player;

    player.dash_timer = (player.dash_timer - dt).max(0.0);
    player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
    player.invulnerable = (player.invulnerable - dt).max(0.0);
    player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    player.weapon_buff = (player.weapon_buff - dt).max(0.0);

    let dir = input.movement();
    let mut dashed = false;
    if input.dash && player.dash_cooldown <= 0.0 {
        player.dash_dir = if dir == Vec2::ZERO { Vec2::NEG_Y } else { dir };
        player.dash_timer = tuning.player.dash_duration;
        player.dash_cooldown = tuning.player.dash_cooldown;
        player.invulnerable = player.invulnerable.max(tuning.player.dash_invulnerability);
        dashed = true;
    }

    let velocity = if player.is_dashing() {
        player.dash_dir * tuning.player.dash_speed
    } else {
        dir * player.speed
    };
    let r = player.radius;
    player.pos += velocity * dt;
    player.pos.x = player.pos.x.clamp(r, (tuning.arena.width - r).max(r));
    player.pos.y = player.pos.y.clamp(r, (tuning.arena.height - r).max(r));

    let mut shots = Vec::new();
    if input.fire && player.fire_cooldown <= 0.0 {
        let weapon = &tuning.weapon;
        let muzzle = player.pos - Vec2::new(0.0, r);
        if player.is_buffed() {
            player.fire_cooldown = weapon.buffed_fire_cooldown;
            let bolts = weapon.buffed_bolts.max(1);
            let mid = (bolts - 1) as f32 * 0.5;
            for i in 0..bolts {
                let angle = -FRAC_PI_2 + (i as f32 - mid) * weapon.buffed_spread;
                shots.push(Laser {
                    pos: muzzle,
                    vel: from_angle(angle, weapon.buffed_speed),
                    damage: weapon.buffed_damage,
                    radius: weapon.laser_radius.max(1.0),
                    ttl: weapon.laser_ttl,
                    dead: false,
                });
            }
        } else {
            player.fire_cooldown = weapon.fire_cooldown;
            shots.push(Laser {
                pos: muzzle,
                vel: Vec2::new(0.0, -weapon.laser_speed),
                damage: weapon.laser_damage,
                radius: weapon.laser_radius.max(1.0),
                ttl: weapon.laser_ttl,
                dead: false,
            });
        }
    }
    let pos = player.pos;

    if dashed {
        state.effects.burst(&mut state.pools.particles, Burst::Dash, pos, PLAYER_COLOR);
        state.effects.cue(AudioCue::Dash);
    }
    if let Some(first) = shots.first() {
        let muzzle = first.pos;
        state.effects.burst(&mut state.pools.particles, Burst::Muzzle, muzzle, LASER_COLOR);
        state.effects.cue(AudioCue::Fire);
        state.pools.player_lasers.append(&mut shots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    fn playing() -> SimulationState {
        let mut state = SimulationState::new(5, Tuning::default());
        state.start();
        state
    }

    #[test]
    fn test_diagonal_move_is_not_faster() {
        let mut state = playing();
        let start = state.pools.player.pos;
        let input = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        update(&mut state, &input, 0.02);
        let moved = state.pools.player.pos.distance(start);
        assert!((moved - state.pools.player.speed * 0.02).abs() < 1e-3);
    }

    #[test]
    fn test_player_stays_in_arena() {
        let mut state = playing();
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        for _ in 0..400 {
            update(&mut state, &input, 0.035);
        }
        let p = &state.pools.player;
        assert_eq!(p.pos.x, state.tuning.arena.width - p.radius);
        assert_eq!(p.pos.y, state.tuning.arena.height - p.radius);
    }

    #[test]
    fn test_dash_grants_invulnerability_then_cooldown() {
        let mut state = playing();
        let dash = TickInput {
            dash: true,
            right: true,
            ..Default::default()
        };
        update(&mut state, &dash, 0.01);
        let p = &state.pools.player;
        assert!(p.is_dashing());
        assert!(p.invulnerable > p.dash_timer);
        assert_eq!(p.dash_dir, Vec2::X);

        // dash ends but invulnerability outlasts it
        let idle = TickInput::default();
        let dash_duration = state.tuning.player.dash_duration;
        update(&mut state, &idle, dash_duration);
        assert!(!state.pools.player.is_dashing());
        assert!(state.pools.player.is_invulnerable());

        // still cooling down
        update(&mut state, &dash, 0.01);
        assert!(!state.pools.player.is_dashing());
    }

    #[test]
    fn test_dash_without_direction_goes_up() {
        let mut state = playing();
        let y = state.pools.player.pos.y;
        update(&mut state, &TickInput { dash: true, ..Default::default() }, 0.01);
        assert!(state.pools.player.pos.y < y);
        assert!(state.effects.pending_cues().contains(&AudioCue::Dash));
    }

    #[test]
    fn test_fire_is_cooldown_gated() {
        let mut state = playing();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        update(&mut state, &fire, 0.01);
        update(&mut state, &fire, 0.01);
        assert_eq!(state.pools.player_lasers.len(), 1);
        let cooldown = state.tuning.weapon.fire_cooldown;
        update(&mut state, &fire, cooldown);
        assert_eq!(state.pools.player_lasers.len(), 2);
        assert!(state.pools.player_lasers.iter().all(|l| l.vel.y < 0.0));
    }

    #[test]
    fn test_buffed_fire_spreads() {
        let mut state = playing();
        state.pools.player.weapon_buff = 5.0;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        update(&mut state, &fire, 0.01);
        let lasers = &state.pools.player_lasers;
        let weapon = &state.tuning.weapon;
        assert_eq!(lasers.len(), weapon.buffed_bolts as usize);
        assert!(lasers.iter().all(|l| l.damage == weapon.buffed_damage));
        assert!(lasers.iter().all(|l| (l.vel.length() - weapon.buffed_speed).abs() < 1e-2));
        assert!(lasers[0].vel.x < 0.0 && lasers[2].vel.x > 0.0);
        assert_eq!(state.pools.player.fire_cooldown, weapon.buffed_fire_cooldown);
    }
}
