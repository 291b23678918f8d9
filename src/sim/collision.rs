//! Collision detection and resolution
//!
//! Everything is a circle and entity counts stay small, so every pass is a
//! plain pairwise sweep. Pass order is fixed and every pass skips entities an
//! earlier pass already marked dead.

use glam::Vec2;

use super::effects::{AudioCue, Burst};
use super::state::{DamageSource, GameEvent, Kill, KillCause, PowerupKind, SimulationState};

/// Circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Run all four passes in order
pub fn resolve(state: &mut SimulationState) {
    player_lasers_vs_enemies(state);
    enemy_lasers_vs_player(state);
    enemy_bodies_vs_player(state);
    player_vs_powerups(state);
}

/// Pass 1: each laser hits at most one enemy, the first live one it touches
pub fn player_lasers_vs_enemies(state: &mut SimulationState) {
    let mut kills = Vec::new();
    let mut hits = 0;

    for laser in state.pools.player_lasers.iter_mut().filter(|l| !l.dead) {
        for enemy in state.pools.enemies.iter_mut() {
            if enemy.dead || !circles_overlap(laser.pos, laser.radius, enemy.pos, enemy.radius) {
                continue;
            }
            laser.dead = true;
            enemy.hp = (enemy.hp - laser.damage).min(enemy.max_hp);
            if enemy.hp <= 0.0 {
                enemy.hp = 0.0;
                enemy.dead = true;
                kills.push(Kill::of(enemy, KillCause::Laser));
            } else {
                hits += 1;
                state
                    .effects
                    .burst(&mut state.pools.particles, Burst::Hit, laser.pos, enemy.palette.core);
            }
            break;
        }
    }

    if hits > 0 {
        state.effects.cue(AudioCue::Hit);
    }
    for kill in kills {
        state.settle_kill(kill);
    }
}

/// Pass 2: invulnerable players let enemy fire pass straight through
pub fn enemy_lasers_vs_player(state: &mut SimulationState) {
    for i in 0..state.pools.enemy_lasers.len() {
        let player = &state.pools.player;
        if player.is_depleted() {
            return;
        }
        let laser = &state.pools.enemy_lasers[i];
        if laser.dead || player.is_invulnerable() {
            continue;
        }
        if !circles_overlap(laser.pos, laser.radius, player.pos, player.radius) {
            continue;
        }
        let damage = laser.damage;
        state.pools.enemy_lasers[i].dead = true;
        state.hurt_player(damage, DamageSource::EnemyLaser);
    }
}

/// Pass 3: ramming kills the enemy without credit and hurts the player
pub fn enemy_bodies_vs_player(state: &mut SimulationState) {
    let damage = state.tuning.waves.contact_damage;
    for i in 0..state.pools.enemies.len() {
        let player = &state.pools.player;
        if player.is_depleted() {
            return;
        }
        let enemy = &state.pools.enemies[i];
        if enemy.dead || !circles_overlap(enemy.pos, enemy.radius, player.pos, player.radius) {
            continue;
        }
        let kill = Kill::of(enemy, KillCause::Contact);
        state.pools.enemies[i].dead = true;
        state.settle_kill(kill);
        state.hurt_player(damage, DamageSource::Contact);
    }
}

/// Pass 4: pickups apply on contact
pub fn player_vs_powerups(state: &mut SimulationState) {
    let player_pos = state.pools.player.pos;
    let player_radius = state.pools.player.radius;
    if state.pools.player.is_depleted() {
        return;
    }

    let mut collected = Vec::new();
    for powerup in state.pools.powerups.iter_mut().filter(|p| !p.dead) {
        if circles_overlap(powerup.pos, powerup.radius, player_pos, player_radius) {
            powerup.dead = true;
            collected.push((powerup.id, powerup.kind));
        }
    }

    for (id, kind) in collected {
        match kind {
            PowerupKind::Shield => {
                let amount = state.tuning.powerups.shield_amount;
                state.pools.player.adjust_shield(amount);
            }
            PowerupKind::WeaponBuff => {
                state.pools.player.weapon_buff = state.tuning.weapon.buff_duration;
            }
        }
        state
            .effects
            .burst(&mut state.pools.particles, Burst::Hit, player_pos, kind.color());
        state.effects.cue(AudioCue::Pickup);
        state.events.push(GameEvent::PowerupCollected { id, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::state::{EnemyVariant, Laser, Powerup};

    fn playing() -> SimulationState {
        let mut state = SimulationState::new(21, Tuning::default());
        state.start();
        state.director.enemies_to_spawn = 0;
        state.drain_events();
        state
    }

    fn laser_at(pos: Vec2, damage: f32) -> Laser {
        Laser {
            pos,
            vel: Vec2::ZERO,
            damage,
            radius: 4.0,
            ttl: 1.0,
            dead: false,
        }
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.1, 0.0), 5.0));
    }

    #[test]
    fn test_laser_kills_first_live_enemy_only() {
        let mut state = playing();
        let pos = Vec2::new(300.0, 200.0);
        state.insert_enemy(EnemyVariant::Scout, false, pos);
        state.insert_enemy(EnemyVariant::Scout, false, pos);
        state.pools.player_lasers.push(laser_at(pos, 1000.0));

        player_lasers_vs_enemies(&mut state);
        assert!(state.pools.enemies[0].dead);
        assert!(!state.pools.enemies[1].dead);
        assert!(state.pools.player_lasers[0].dead);
        assert_eq!(state.tracker.score, 236);
        assert_eq!(state.tracker.multiplier, 2);
        assert_eq!(state.tracker.overdrive_charge, 1);
    }

    #[test]
    fn test_second_laser_skips_dead_enemy() {
        let mut state = playing();
        let pos = Vec2::new(300.0, 200.0);
        state.insert_enemy(EnemyVariant::Scout, false, pos);
        state.pools.player_lasers.push(laser_at(pos, 1000.0));
        state.pools.player_lasers.push(laser_at(pos, 1000.0));

        player_lasers_vs_enemies(&mut state);
        assert!(state.pools.player_lasers[0].dead);
        // nothing left to hit
        assert!(!state.pools.player_lasers[1].dead);
        let kills = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn test_wounding_hit_keeps_enemy_alive() {
        let mut state = playing();
        let pos = Vec2::new(300.0, 200.0);
        state.insert_enemy(EnemyVariant::Brute, false, pos);
        state.pools.player_lasers.push(laser_at(pos, 20.0));
        player_lasers_vs_enemies(&mut state);
        let brute = &state.pools.enemies[0];
        assert!(!brute.dead);
        assert!(brute.hp < brute.max_hp);
        assert_eq!(state.tracker.score, 0);
    }

    #[test]
    fn test_enemy_laser_hurts_unless_invulnerable() {
        let mut state = playing();
        let pos = state.pools.player.pos;
        state.pools.enemy_lasers.push(laser_at(pos, 15.0));
        state.pools.enemy_lasers.push(laser_at(pos, 15.0));
        enemy_lasers_vs_player(&mut state);

        // first hit grants grace time, second laser passes through
        assert!(state.pools.enemy_lasers[0].dead);
        assert!(!state.pools.enemy_lasers[1].dead);
        assert_eq!(state.pools.player.shield, 85.0);
    }

    #[test]
    fn test_body_that_died_to_laser_does_not_ram() {
        let mut state = playing();
        let pos = state.pools.player.pos;
        state.insert_enemy(EnemyVariant::Scout, false, pos);
        state.pools.player_lasers.push(laser_at(pos, 1000.0));

        resolve(&mut state);
        assert_eq!(state.pools.player.shield, state.pools.player.max_shield);
        assert_eq!(state.tracker.score, 236);
    }

    #[test]
    fn test_ramming_is_silent_kill() {
        let mut state = playing();
        let pos = state.pools.player.pos;
        state.insert_enemy(EnemyVariant::Slinger, false, pos);
        state.tracker.multiplier = 5;
        enemy_bodies_vs_player(&mut state);

        assert!(state.pools.enemies[0].dead);
        assert_eq!(state.tracker.score, 0);
        assert_eq!(state.tracker.multiplier, 1);
        assert_eq!(state.tracker.overdrive_charge, 0);
        let expected = state.pools.player.max_shield - state.tuning.waves.contact_damage;
        assert_eq!(state.pools.player.shield, expected);
    }

    #[test]
    fn test_dashing_through_enemy_still_kills_it() {
        let mut state = playing();
        let pos = state.pools.player.pos;
        state.insert_enemy(EnemyVariant::Scout, false, pos);
        state.pools.player.invulnerable = 1.0;
        enemy_bodies_vs_player(&mut state);
        assert!(state.pools.enemies[0].dead);
        assert_eq!(state.pools.player.shield, state.pools.player.max_shield);
    }

    #[test]
    fn test_pickups_apply_and_clamp() {
        let mut state = playing();
        let pos = state.pools.player.pos;
        state.pools.player.shield = 90.0;
        for (id, kind) in [(100, PowerupKind::Shield), (101, PowerupKind::WeaponBuff)] {
            state.pools.powerups.push(Powerup {
                id,
                kind,
                pos,
                fall_speed: 0.0,
                rotation: 0.0,
                radius: 12.0,
                dead: false,
            });
        }
        player_vs_powerups(&mut state);
        assert_eq!(state.pools.player.shield, 100.0);
        assert_eq!(state.pools.player.weapon_buff, state.tuning.weapon.buff_duration);
        assert!(state.pools.powerups.iter().all(|p| p.dead));
        assert_eq!(state.drain_events().len(), 2);
    }

    #[test]
    fn test_depleted_player_is_left_alone() {
        let mut state = playing();
        state.pools.player.shield = 10.0;
        let pos = state.pools.player.pos;
        state.pools.enemy_lasers.push(laser_at(pos, 16.0));
        state.insert_enemy(EnemyVariant::Scout, false, pos);
        resolve(&mut state);

        assert_eq!(state.pools.player.shield, 0.0);
        assert!(!state.running());
        // the ramming pass never ran against a destroyed ship
        assert!(!state.pools.enemies[0].dead);
        assert_eq!(state.summary.map(|s| s.wave), Some(1));
    }
}
