use fracture_game::InputState;

/// Radians per second of camera turn while a turn key is held.
pub const CAMERA_TURN_SPEED: f32 = 1.8;

/// Everything the explore-mode frame loop reads from the keyboard and
/// mouse. Handlers set plain booleans; last write wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExploreInput {
    pub movement: InputState,
    pub turn_left: bool,
    pub turn_right: bool,
}

// Centralized movement keyboard mapping over KeyboardEvent.code values.
// Returns true when the code was consumed.
pub fn apply_key_code(code: &str, pressed: bool, input: &mut ExploreInput) -> bool {
    match code {
        "KeyW" | "ArrowUp" => input.movement.forward = pressed,
        "KeyS" | "ArrowDown" => input.movement.backward = pressed,
        "KeyA" | "ArrowLeft" => input.movement.left = pressed,
        "KeyD" | "ArrowRight" => input.movement.right = pressed,
        "Space" => input.movement.jump = pressed,
        "ShiftLeft" | "ShiftRight" => input.movement.sprint = pressed,
        "KeyQ" => input.turn_left = pressed,
        "KeyE" => input.turn_right = pressed,
        _ => return false,
    }
    true
}

// Right mouse button toggles aiming, as in MouseEvent.button.
pub fn apply_mouse_button(button: i16, pressed: bool, input: &mut ExploreInput) -> bool {
    if button == 2 {
        input.movement.aiming = pressed;
        true
    } else {
        false
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_the_same_flags() {
        let mut input = ExploreInput::default();
        assert!(apply_key_code("KeyW", true, &mut input));
        assert!(input.movement.forward);
        assert!(apply_key_code("KeyW", false, &mut input));
        assert!(!input.movement.forward);

        assert!(apply_key_code("ArrowUp", true, &mut input));
        assert!(input.movement.forward);
        assert!(apply_key_code("ArrowLeft", true, &mut input));
        assert!(input.movement.left);
    }

    #[test]
    fn jump_sprint_and_turn_keys() {
        let mut input = ExploreInput::default();
        apply_key_code("Space", true, &mut input);
        apply_key_code("ShiftRight", true, &mut input);
        apply_key_code("KeyQ", true, &mut input);
        assert!(input.movement.jump);
        assert!(input.movement.sprint);
        assert!(input.turn_left);
    }

    #[test]
    fn unknown_codes_are_not_consumed() {
        let mut input = ExploreInput::default();
        assert!(!apply_key_code("KeyZ", true, &mut input));
        assert_eq!(input, ExploreInput::default());
    }

    #[test]
    fn right_button_controls_aiming() {
        let mut input = ExploreInput::default();
        assert!(apply_mouse_button(2, true, &mut input));
        assert!(input.movement.aiming);
        assert!(apply_mouse_button(2, false, &mut input));
        assert!(!input.movement.aiming);
        assert!(!apply_mouse_button(0, true, &mut input));
    }

    #[test]
    fn repeated_presses_are_idempotent() {
        let mut input = ExploreInput::default();
        apply_key_code("KeyD", true, &mut input);
        let after_first = input;
        apply_key_code("KeyD", true, &mut input);
        assert_eq!(input, after_first);
    }
}
