//! Enemy movement and guns, plus the passive pools (lasers, particles,
//! powerups) that only integrate and expire.

use super::effects::Burst;
use super::state::{DamageSource, GameEvent, Laser, SimulationState};
use crate::consts::OFFSCREEN_MARGIN;

const ENEMY_LASER_COLOR: u32 = 0xff3864;
/// Fraction of particle velocity kept per second
const PARTICLE_DRAG: f32 = 0.08;

/// Move every live enemy along its pattern and fire ready guns
pub fn update(state: &mut SimulationState, dt: f32) {
    let target = state.pools.player.pos;
    let waves = &state.tuning.waves;

    for enemy in state.pools.enemies.iter_mut().filter(|e| !e.dead) {
        enemy.age += dt;
        enemy.pos.y += enemy.speed * dt;
        enemy.pos.x = enemy.anchor_x + enemy.pattern.lateral_offset(enemy.age, enemy.phase);

        // Guns stay cold until the enemy is on screen
        let Some(gun) = enemy.gun.as_mut() else {
            continue;
        };
        if enemy.pos.y < 0.0 {
            continue;
        }
        gun.timer -= dt;
        if gun.timer > 0.0 {
            continue;
        }
        gun.timer = gun.interval;

        // Aim at where the player is now; no lead
        let dir = (target - enemy.pos).normalize_or(glam::Vec2::Y);
        let muzzle = enemy.pos + dir * enemy.radius;
        state.pools.enemy_lasers.push(Laser {
            pos: muzzle,
            vel: dir * gun.projectile_speed,
            damage: gun.damage,
            radius: waves.enemy_laser_radius.max(1.0),
            ttl: waves.enemy_laser_ttl,
            dead: false,
        });
        state
            .effects
            .burst(&mut state.pools.particles, Burst::Muzzle, muzzle, ENEMY_LASER_COLOR);
    }
}

/// Integrate lasers, particles and powerups; mark expired ones dead
pub fn update_projectiles(state: &mut SimulationState, dt: f32) {
    let width = state.tuning.arena.width;
    let height = state.tuning.arena.height;
    let out_of_bounds = |p: glam::Vec2| {
        p.x < -OFFSCREEN_MARGIN
            || p.x > width + OFFSCREEN_MARGIN
            || p.y < -OFFSCREEN_MARGIN
            || p.y > height + OFFSCREEN_MARGIN
    };

    for laser in state
        .pools
        .player_lasers
        .iter_mut()
        .chain(state.pools.enemy_lasers.iter_mut())
        .filter(|l| !l.dead)
    {
        laser.pos += laser.vel * dt;
        laser.ttl -= dt;
        if laser.ttl <= 0.0 || out_of_bounds(laser.pos) {
            laser.dead = true;
        }
    }

    let drag = PARTICLE_DRAG.powf(dt);
    for particle in state.pools.particles.iter_mut().filter(|p| !p.dead) {
        particle.pos += particle.vel * dt;
        particle.vel *= drag;
        particle.life -= dt;
        if particle.life <= 0.0 {
            particle.dead = true;
        }
    }

    let spin = state.tuning.powerups.spin;
    for powerup in state.pools.powerups.iter_mut().filter(|p| !p.dead) {
        powerup.pos.y += powerup.fall_speed * dt;
        powerup.rotation = (powerup.rotation + spin * dt) % std::f32::consts::TAU;
        if powerup.pos.y - powerup.radius > height {
            powerup.dead = true;
        }
    }
}

/// Enemies past the bottom edge escape: no score, but the player pays.
/// Runs after collisions so a same-tick laser kill takes precedence.
pub fn resolve_escapes(state: &mut SimulationState) {
    let height = state.tuning.arena.height;
    let mut escaped = Vec::new();
    for enemy in state.pools.enemies.iter_mut().filter(|e| !e.dead) {
        if enemy.pos.y - enemy.radius > height {
            enemy.dead = true;
            escaped.push(enemy.id);
        }
    }

    let damage = state.tuning.waves.escape_damage;
    for id in escaped {
        log::debug!("Enemy #{} escaped", id);
        state.events.push(GameEvent::EnemyEscaped { id });
        state.hurt_player(damage, DamageSource::Escape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::state::{EnemyVariant, Particle, Powerup, PowerupKind};
    use glam::Vec2;

    fn playing() -> SimulationState {
        let mut state = SimulationState::new(9, Tuning::default());
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_pattern_offset_is_closed_form() {
        let mut state = playing();
        state.insert_enemy(EnemyVariant::Slinger, false, Vec2::new(400.0, 50.0));
        state.pools.enemies[0].phase = 0.7;
        for _ in 0..10 {
            update(&mut state, 0.03);
        }
        let e = &state.pools.enemies[0];
        let expected = 400.0 + e.pattern.lateral_offset(e.age, 0.7);
        assert!((e.pos.x - expected).abs() < 1e-3);
        assert!((e.pos.y - (50.0 + e.speed * 0.3)).abs() < 1e-2);
    }

    #[test]
    fn test_shooter_aims_at_player() {
        let mut state = playing();
        state.insert_enemy(EnemyVariant::Brute, false, Vec2::new(400.0, 100.0));
        state.pools.enemies[0].gun.as_mut().unwrap().timer = 0.0;
        state.pools.player.pos = Vec2::new(400.0, 500.0);
        update(&mut state, 0.001);

        assert_eq!(state.pools.enemy_lasers.len(), 1);
        let laser = &state.pools.enemy_lasers[0];
        assert!(laser.vel.y > 0.0);
        assert!(laser.vel.x.abs() < laser.vel.y * 0.1);
        let gun = state.pools.enemies[0].gun.unwrap();
        assert_eq!(gun.timer, gun.interval);
        assert!((laser.vel.length() - gun.projectile_speed).abs() < 1e-2);
    }

    #[test]
    fn test_scouts_never_fire() {
        let mut state = playing();
        state.insert_enemy(EnemyVariant::Scout, true, Vec2::new(400.0, 100.0));
        for _ in 0..200 {
            update(&mut state, 0.03);
        }
        assert!(state.pools.enemy_lasers.is_empty());
    }

    #[test]
    fn test_guns_wait_until_on_screen() {
        let mut state = playing();
        state.insert_enemy(EnemyVariant::Slinger, false, Vec2::new(400.0, -200.0));
        state.pools.enemies[0].gun.as_mut().unwrap().timer = 0.0;
        update(&mut state, 0.01);
        assert!(state.pools.enemy_lasers.is_empty());
    }

    #[test]
    fn test_lasers_expire() {
        let mut state = playing();
        state.pools.player_lasers.push(Laser {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(0.0, -10.0),
            damage: 1.0,
            radius: 2.0,
            ttl: 0.05,
            dead: false,
        });
        state.pools.enemy_lasers.push(Laser {
            pos: Vec2::new(100.0, 599.0),
            vel: Vec2::new(0.0, 5000.0),
            damage: 1.0,
            radius: 2.0,
            ttl: 10.0,
            dead: false,
        });
        update_projectiles(&mut state, 0.03);
        assert!(!state.pools.player_lasers[0].dead);
        assert!(state.pools.enemy_lasers[0].dead);
        update_projectiles(&mut state, 0.03);
        assert!(state.pools.player_lasers[0].dead);
    }

    #[test]
    fn test_particles_slow_and_die() {
        let mut state = playing();
        state.pools.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 0.1,
            max_life: 0.1,
            size: 2.0,
            color: 0,
            dead: false,
        });
        update_projectiles(&mut state, 0.05);
        assert!(state.pools.particles[0].vel.x < 100.0);
        update_projectiles(&mut state, 0.06);
        assert!(state.pools.particles[0].dead);
    }

    #[test]
    fn test_escape_damages_without_score() {
        let mut state = playing();
        state.tracker.multiplier = 4;
        let height = state.tuning.arena.height;
        state.insert_enemy(EnemyVariant::Scout, false, Vec2::new(200.0, height + 40.0));
        state.pools.player.invulnerable = 5.0;
        resolve_escapes(&mut state);

        assert!(state.pools.enemies[0].dead);
        assert_eq!(state.tracker.score, 0);
        assert_eq!(state.tracker.multiplier, 1);
        let expected = state.tuning.player.max_shield - state.tuning.waves.escape_damage;
        assert_eq!(state.pools.player.shield, expected);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::EnemyEscaped { .. }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::EnemyKilled { .. })));
    }

    #[test]
    fn test_powerup_falls_and_leaves_bottom_edge() {
        let mut state = playing();
        let height = state.tuning.arena.height;
        for (id, y) in [(1, 200.0), (2, height + 11.0)] {
            state.pools.powerups.push(Powerup {
                id,
                kind: PowerupKind::Shield,
                pos: Vec2::new(300.0, y),
                fall_speed: 60.0,
                rotation: 0.0,
                radius: 12.0,
                dead: false,
            });
        }

        update_projectiles(&mut state, 0.1);
        let on_screen = &state.pools.powerups[0];
        assert!(!on_screen.dead);
        assert!((on_screen.pos.y - 206.0).abs() < 1e-4);
        // 6 units of fall carries its top edge past the bottom
        assert!(state.pools.powerups[1].dead);

        state.pools.purge_dead();
        assert_eq!(state.pools.powerups.len(), 1);
        assert_eq!(state.pools.powerups[0].id, 1);
    }
}
