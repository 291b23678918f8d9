//! Platform abstraction layer
//!
//! Maps browser input names onto control intents. Listeners call
//! [`InputState::press`](crate::sim::InputState::press) and `release` with
//! the result; the simulation never sees raw key names.

use crate::sim::Control;

/// `KeyboardEvent.key` value to control, if bound
pub fn control_for_key(key: &str) -> Option<Control> {
    let control = match key {
        "ArrowUp" | "w" | "W" => Control::Up,
        "ArrowDown" | "s" | "S" => Control::Down,
        "ArrowLeft" | "a" | "A" => Control::Left,
        "ArrowRight" | "d" | "D" => Control::Right,
        " " | "j" | "J" => Control::Fire,
        "Shift" | "k" | "K" => Control::Dash,
        "e" | "E" | "q" | "Q" => Control::Overdrive,
        "p" | "P" | "Escape" => Control::Pause,
        "Enter" => Control::Start,
        _ => return None,
    };
    Some(control)
}

/// Shell-level actions that change preferences, not the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    ToggleMute,
}

/// `KeyboardEvent.key` value to host action, if bound
pub fn host_action_for_key(key: &str) -> Option<HostAction> {
    match key {
        "m" | "M" => Some(HostAction::ToggleMute),
        _ => None,
    }
}

/// `MouseEvent.button` value to control; only the primary button fires
pub fn control_for_button(button: i16) -> Option<Control> {
    (button == 0).then_some(Control::PointerFire)
}

/// Keys whose browser default (scrolling, focus moves) should be suppressed
pub fn suppresses_default(key: &str) -> bool {
    matches!(key, " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::InputState;

    #[test]
    fn test_arrows_and_wasd_agree() {
        for (arrow, letter) in [("ArrowUp", "w"), ("ArrowDown", "s"), ("ArrowLeft", "a"), ("ArrowRight", "D")] {
            assert_eq!(control_for_key(arrow), control_for_key(letter));
            assert!(control_for_key(arrow).is_some());
        }
    }

    #[test]
    fn test_action_bindings() {
        assert_eq!(control_for_key(" "), Some(Control::Fire));
        assert_eq!(control_for_key("Shift"), Some(Control::Dash));
        assert_eq!(control_for_key("E"), Some(Control::Overdrive));
        assert_eq!(control_for_key("Escape"), Some(Control::Pause));
        assert_eq!(control_for_key("Enter"), Some(Control::Start));
        assert_eq!(control_for_key("F5"), None);
        assert_eq!(control_for_button(0), Some(Control::PointerFire));
        assert_eq!(control_for_button(2), None);
        assert!(suppresses_default(" "));
        assert!(!suppresses_default("Enter"));
    }

    #[test]
    fn test_mute_key_is_not_a_control() {
        for key in ["m", "M"] {
            assert_eq!(host_action_for_key(key), Some(HostAction::ToggleMute));
            assert_eq!(control_for_key(key), None);
        }
        assert_eq!(host_action_for_key("p"), None);
    }

    #[test]
    fn test_key_repeat_is_one_edge() {
        let mut input = InputState::default();
        // browsers resend keydown while held
        for _ in 0..5 {
            if let Some(c) = control_for_key("Shift") {
                input.press(c);
            }
        }
        assert!(input.take_tick_input().dash);
        assert!(!input.take_tick_input().dash);
    }
}
