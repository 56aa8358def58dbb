/// Gamepad input, merged into the same held-action model as the keyboard.
///
/// Directions, jump and interact are level-triggered: they count for every
/// frame the button (or stick) stays down. Confirm and cancel are edges and
/// fire once per press. Without the `gamepad` feature nothing is ever held.
///
/// Default bindings (overridable in `[gamepad]`):
///   D-pad / left stick  →  walk / climb / drop
///   A                   →  jump
///   X / B               →  open chest
///   Start               →  start / restart a run
///   Select              →  quit

use std::collections::HashSet;

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::FrameInput;

/// Stick deflection needed before it counts as a direction.
const STICK_DEADZONE: f32 = 0.25;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PadButton {
    South,
    East,
    West,
    North,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Start,
    Select,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl PadButton {
    /// Parse a button name from the config file. Face buttons accept both
    /// the Xbox letter and the compass name.
    fn parse(name: &str) -> Option<PadButton> {
        let button = match name.trim().to_ascii_lowercase().as_str() {
            "a" | "south" => PadButton::South,
            "b" | "east" => PadButton::East,
            "x" | "west" => PadButton::West,
            "y" | "north" => PadButton::North,
            "lb" | "l1" => PadButton::LeftBumper,
            "rb" | "r1" => PadButton::RightBumper,
            "lt" | "l2" => PadButton::LeftTrigger,
            "rt" | "r2" => PadButton::RightTrigger,
            "start" => PadButton::Start,
            "select" | "back" => PadButton::Select,
            _ => return None,
        };
        Some(button)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(button: Button) -> Option<PadButton> {
        let button = match button {
            Button::South => PadButton::South,
            Button::East => PadButton::East,
            Button::West => PadButton::West,
            Button::North => PadButton::North,
            Button::LeftTrigger => PadButton::LeftBumper,
            Button::RightTrigger => PadButton::RightBumper,
            Button::LeftTrigger2 => PadButton::LeftTrigger,
            Button::RightTrigger2 => PadButton::RightTrigger,
            Button::Start => PadButton::Start,
            Button::Select => PadButton::Select,
            Button::DPadUp => PadButton::DPadUp,
            Button::DPadDown => PadButton::DPadDown,
            Button::DPadLeft => PadButton::DPadLeft,
            Button::DPadRight => PadButton::DPadRight,
            _ => return None,
        };
        Some(button)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PadAction {
    Jump,
    Interact,
    Confirm,
    Cancel,
}

#[derive(Debug, PartialEq)]
struct Bindings {
    jump: Vec<PadButton>,
    interact: Vec<PadButton>,
    confirm: Vec<PadButton>,
    cancel: Vec<PadButton>,
}

impl Default for Bindings {
    fn default() -> Self {
        Bindings {
            jump: vec![PadButton::South],
            interact: vec![PadButton::West, PadButton::East],
            confirm: vec![PadButton::Start],
            cancel: vec![PadButton::Select],
        }
    }
}

impl Bindings {
    /// An empty or entirely unknown list keeps the default for that action.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_or(names: &[String], fallback: Vec<PadButton>) -> Vec<PadButton> {
            let parsed: Vec<PadButton> = names.iter().filter_map(|n| PadButton::parse(n)).collect();
            if parsed.is_empty() { fallback } else { parsed }
        }
        let d = Bindings::default();
        Bindings {
            jump: parse_or(&cfg.jump, d.jump),
            interact: parse_or(&cfg.interact, d.interact),
            confirm: parse_or(&cfg.confirm, d.confirm),
            cancel: parse_or(&cfg.cancel, d.cancel),
        }
    }

    fn buttons(&self, action: PadAction) -> &[PadButton] {
        match action {
            PadAction::Jump => &self.jump,
            PadAction::Interact => &self.interact,
            PadAction::Confirm => &self.confirm,
            PadAction::Cancel => &self.cancel,
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    held: HashSet<PadButton>,
    /// Buttons that went down since the last `update`.
    pressed: HashSet<PadButton>,
    stick_x: f32,
    stick_y: f32,
    bindings: Bindings,
}

impl GamepadState {
    pub fn new() -> Self {
        GamepadState {
            // No backend (headless, no permissions) just means no pad.
            #[cfg(feature = "gamepad")]
            gilrs: Gilrs::new().ok(),
            held: HashSet::new(),
            pressed: HashSet::new(),
            stick_x: 0.0,
            stick_y: 0.0,
            bindings: Bindings::default(),
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.bindings = Bindings::from_config(cfg);
    }

    /// Drain pad events. Call once per frame, next to `InputState::drain_events`.
    pub fn update(&mut self) {
        self.pressed.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else { return };
        let events: Vec<EventType> = std::iter::from_fn(|| gilrs.next_event()).map(|e| e.event).collect();

        for event in events {
            match event {
                EventType::ButtonPressed(b, _) => {
                    if let Some(b) = PadButton::from_gilrs(b) { self.press(b); }
                }
                EventType::ButtonReleased(b, _) => {
                    if let Some(b) = PadButton::from_gilrs(b) { self.release(b); }
                }
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick_x = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick_y = v,
                EventType::Disconnected => self.release_all(),
                _ => {}
            }
        }
    }

    // ── Queries ──

    pub fn held(&self, action: PadAction) -> bool {
        self.bindings.buttons(action).iter().any(|b| self.held.contains(b))
    }

    pub fn pressed(&self, action: PadAction) -> bool {
        self.bindings.buttons(action).iter().any(|b| self.pressed.contains(b))
    }

    /// OR the pad's held directions and actions into a keyboard frame.
    pub fn merge_into(&self, input: &mut FrameInput) {
        input.left |= self.held.contains(&PadButton::DPadLeft) || self.stick_x < -STICK_DEADZONE;
        input.right |= self.held.contains(&PadButton::DPadRight) || self.stick_x > STICK_DEADZONE;
        // gilrs reports stick up as positive Y.
        input.up |= self.held.contains(&PadButton::DPadUp) || self.stick_y > STICK_DEADZONE;
        input.down |= self.held.contains(&PadButton::DPadDown) || self.stick_y < -STICK_DEADZONE;
        input.jump |= self.held(PadAction::Jump);
        input.interact |= self.held(PadAction::Interact);
    }
}

// Event application; only the gilrs poller and tests feed these.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
impl GamepadState {
    fn press(&mut self, button: PadButton) {
        if self.held.insert(button) {
            self.pressed.insert(button);
        }
    }

    fn release(&mut self, button: PadButton) {
        self.held.remove(&button);
    }

    fn release_all(&mut self) {
        self.held.clear();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn pad() -> GamepadState {
        let mut pad = GamepadState::new();
        pad.update();
        pad
    }

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(PadButton::parse("a"), Some(PadButton::South));
        assert_eq!(PadButton::parse("South"), Some(PadButton::South));
        assert_eq!(PadButton::parse(" back "), Some(PadButton::Select));
        assert_eq!(PadButton::parse("RT"), Some(PadButton::RightTrigger));
        assert_eq!(PadButton::parse("Turbo"), None);
    }

    #[test]
    fn config_overrides_bindings() {
        let b = Bindings::from_config(&GamepadConfig {
            jump: names(&["B", "nonsense"]),
            interact: names(&["Y"]),
            confirm: vec![],
            cancel: names(&["Start"]),
        });
        assert_eq!(b.jump, vec![PadButton::East]);
        assert_eq!(b.interact, vec![PadButton::North]);
        assert_eq!(b.confirm, vec![PadButton::Start]);
        assert_eq!(b.cancel, vec![PadButton::Start]);
    }

    #[test]
    fn jump_counts_while_held_confirm_only_on_press() {
        let mut pad = pad();
        pad.press(PadButton::South);
        pad.press(PadButton::Start);
        assert!(pad.held(PadAction::Jump));
        assert!(pad.pressed(PadAction::Confirm));

        pad.update();
        assert!(pad.held(PadAction::Jump));
        assert!(!pad.pressed(PadAction::Confirm));

        // a repeat of a held button is not a new press
        pad.press(PadButton::Start);
        assert!(!pad.pressed(PadAction::Confirm));

        pad.release(PadButton::South);
        assert!(!pad.held(PadAction::Jump));
    }

    #[test]
    fn merge_adds_dpad_stick_and_actions() {
        let mut pad = pad();
        pad.press(PadButton::DPadLeft);
        pad.press(PadButton::West);
        pad.stick_y = 0.8;

        let mut input = FrameInput { right: true, ..FrameInput::default() };
        pad.merge_into(&mut input);
        assert!(input.left && input.right && input.up && input.interact);
        assert!(!input.down && !input.jump);
    }

    #[test]
    fn stick_inside_deadzone_is_ignored() {
        let mut pad = pad();
        pad.stick_x = 0.2;
        pad.stick_y = -0.2;
        let mut input = FrameInput::default();
        pad.merge_into(&mut input);
        assert_eq!(input, FrameInput::default());
    }

    #[test]
    fn disconnect_releases_everything() {
        let mut pad = pad();
        pad.press(PadButton::DPadRight);
        pad.press(PadButton::South);
        pad.stick_x = -1.0;
        pad.release_all();

        let mut input = FrameInput::default();
        pad.merge_into(&mut input);
        assert_eq!(input, FrameInput::default());
    }
}
