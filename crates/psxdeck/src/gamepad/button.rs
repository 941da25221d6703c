use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Buttons drawn on the touch gamepad
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
pub enum VirtualButton {
    #[strum(serialize = "up")]
    Up,
    #[strum(serialize = "down")]
    Down,
    #[strum(serialize = "left")]
    Left,
    #[strum(serialize = "right")]
    Right,
    #[strum(serialize = "triangle")]
    Triangle,
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "cross")]
    Cross,
    #[strum(serialize = "square")]
    Square,
    #[strum(serialize = "start")]
    Start,
    #[strum(serialize = "select")]
    Select,
    L1,
    L2,
    R1,
    R2,
}

/// Keyboard key the emulator listens to for a button, matching its desktop controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: &'static str,
    pub code: &'static str,
    pub key_code: u32,
}

impl KeyBinding {
    const fn new(key: &'static str, code: &'static str, key_code: u32) -> Self {
        Self {
            key,
            code,
            key_code,
        }
    }
}

impl VirtualButton {
    pub const fn binding(&self) -> KeyBinding {
        match self {
            VirtualButton::Up => KeyBinding::new("ArrowUp", "ArrowUp", 38),
            VirtualButton::Down => KeyBinding::new("ArrowDown", "ArrowDown", 40),
            VirtualButton::Left => KeyBinding::new("ArrowLeft", "ArrowLeft", 37),
            VirtualButton::Right => KeyBinding::new("ArrowRight", "ArrowRight", 39),
            VirtualButton::Triangle => KeyBinding::new("d", "KeyD", 68),
            VirtualButton::Circle => KeyBinding::new("x", "KeyX", 88),
            VirtualButton::Cross => KeyBinding::new("z", "KeyZ", 90),
            VirtualButton::Square => KeyBinding::new("s", "KeyS", 83),
            VirtualButton::Start => KeyBinding::new("v", "KeyV", 86),
            VirtualButton::Select => KeyBinding::new("c", "KeyC", 67),
            VirtualButton::L1 => KeyBinding::new("q", "KeyQ", 81),
            VirtualButton::L2 => KeyBinding::new("w", "KeyW", 87),
            VirtualButton::R1 => KeyBinding::new("e", "KeyE", 69),
            VirtualButton::R2 => KeyBinding::new("r", "KeyR", 82),
        }
    }

    pub const fn is_direction(&self) -> bool {
        matches!(
            self,
            VirtualButton::Up | VirtualButton::Down | VirtualButton::Left | VirtualButton::Right
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn names_parse() {
        assert_eq!("triangle".parse::<VirtualButton>().unwrap(), VirtualButton::Triangle);
        assert_eq!("L2".parse::<VirtualButton>().unwrap(), VirtualButton::L2);
        assert_eq!(VirtualButton::Select.to_string(), "select");
        assert!("home".parse::<VirtualButton>().is_err());
    }

    #[test]
    fn bindings() {
        assert_eq!(
            VirtualButton::Cross.binding(),
            KeyBinding::new("z", "KeyZ", 90)
        );
        assert_eq!(VirtualButton::Start.binding().key_code, 86);
        assert_eq!(VirtualButton::Left.binding().code, "ArrowLeft");
        assert_eq!(VirtualButton::R2.binding().key, "r");
    }

    #[test]
    fn every_button_has_its_own_key() {
        let codes: HashSet<_> = VirtualButton::iter()
            .map(|button| button.binding().key_code)
            .collect();

        assert_eq!(codes.len(), VirtualButton::iter().count());
    }
}
