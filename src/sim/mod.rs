//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Removal only in the end-of-tick sweep
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod input;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;
pub mod wave;

pub use clock::SimulationClock;
pub use collision::circles_overlap;
pub use effects::{AudioCue, Burst, EffectsEmitter, ToneRequest, Waveform};
pub use input::{Control, InputState, TickInput};
pub use score::ScoreTracker;
pub use state::{
    DamageSource, Enemy, EnemyGun, EnemyVariant, EntityPools, GameEvent, GameOverSummary,
    GamePhase, KillCause, Laser, MovementPattern, Palette, Particle, Player, Powerup, PowerupKind,
    SimulationState,
};
pub use tick::tick;
pub use wave::WaveDirector;
