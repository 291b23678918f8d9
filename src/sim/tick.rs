//! Per-frame simulation tick
//!
//! One call advances the whole run by `dt` seconds (already clamped by the
//! clock) and always runs to completion.

use super::input::TickInput;
use super::state::{GamePhase, SimulationState};
use super::{collision, enemy, player, wave};

/// Advance the game state by one frame
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) {
    if input.start && matches!(state.phase, GamePhase::Menu | GamePhase::GameOver) {
        state.start();
        return;
    }

    // Handle pause toggle. Other edges latched with the pause edge are dropped
    // on both transitions, so nothing queued into a pause fires on resume.
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    // Don't tick unless a run is live and unpaused
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = dt.max(0.0);
    state.time_ticks += 1;
    state.elapsed += dt;

    player::update(state, input, dt);
    enemy::update(state, dt);
    enemy::update_projectiles(state, dt);

    collision::resolve(state);
    enemy::resolve_escapes(state);

    if state.running() {
        wave::run(state, dt);

        state.tracker.decay(dt, &state.tuning.scoring);
        if input.overdrive && !state.trigger_overdrive() {
            log::debug!("Overdrive not ready ({} charge)", state.tracker.overdrive_charge);
        }
    }

    state.pools.purge_dead();
}
