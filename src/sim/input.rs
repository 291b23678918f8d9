//! Control intents
//!
//! Raw host events are folded into levels (held directions, fire) and edges
//! (dash, overdrive, pause, start). Edges latch on the up->down transition
//! only, so OS key repeat never retriggers them, and are consumed by the
//! next tick that reads them.

use glam::Vec2;

/// A discrete control the host can press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    /// Keyboard fire
    Fire,
    /// Pointer held down over the playfield
    PointerFire,
    Dash,
    Overdrive,
    Pause,
    Start,
}

impl Control {
    const COUNT: usize = 10;

    fn index(self) -> usize {
        self as usize
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub dash: bool,
    pub overdrive: bool,
    pub pause: bool,
    pub start: bool,
}

impl TickInput {
    /// Normalized sum of the held directions (zero when they cancel out)
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Accumulates host events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [bool; Control::COUNT],
    edges: [bool; Control::COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        let i = control.index();
        if !self.held[i] {
            self.edges[i] = true;
        }
        self.held[i] = true;
    }

    pub fn release(&mut self, control: Control) {
        self.held[control.index()] = false;
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.index()]
    }

    /// Drop every held level and pending edge (window blur, new run)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn take_edge(&mut self, control: Control) -> bool {
        std::mem::take(&mut self.edges[control.index()])
    }

    /// Snapshot levels and consume pending edges
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            up: self.is_held(Control::Up),
            down: self.is_held(Control::Down),
            left: self.is_held(Control::Left),
            right: self.is_held(Control::Right),
            fire: self.is_held(Control::Fire) || self.is_held(Control::PointerFire),
            dash: self.take_edge(Control::Dash),
            overdrive: self.take_edge(Control::Overdrive),
            pause: self.take_edge(Control::Pause),
            start: self.take_edge(Control::Start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_fire_once_per_press() {
        let mut input = InputState::new();
        input.press(Control::Dash);
        // key repeat
        input.press(Control::Dash);
        assert!(input.take_tick_input().dash);
        assert!(!input.take_tick_input().dash);

        input.release(Control::Dash);
        input.press(Control::Dash);
        assert!(input.take_tick_input().dash);
    }

    #[test]
    fn test_tap_between_ticks_still_registers() {
        let mut input = InputState::new();
        input.press(Control::Overdrive);
        input.release(Control::Overdrive);
        let tick = input.take_tick_input();
        assert!(tick.overdrive);
        assert!(!input.is_held(Control::Overdrive));
    }

    #[test]
    fn test_levels_persist_until_release() {
        let mut input = InputState::new();
        input.press(Control::Left);
        input.press(Control::PointerFire);
        assert!(input.take_tick_input().left);
        let tick = input.take_tick_input();
        assert!(tick.left && tick.fire);

        input.release(Control::PointerFire);
        input.press(Control::Fire);
        assert!(input.take_tick_input().fire);
        input.release(Control::Fire);
        assert!(!input.take_tick_input().fire);
    }

    #[test]
    fn test_movement_is_normalized() {
        let tick = TickInput {
            up: true,
            right: true,
            ..Default::default()
        };
        let dir = tick.movement();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.y < 0.0);

        let cancelled = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(cancelled.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_clear_drops_pending_edges() {
        let mut input = InputState::new();
        input.press(Control::Pause);
        input.press(Control::Up);
        input.clear();
        assert_eq!(input.take_tick_input(), TickInput::default());
    }
}
