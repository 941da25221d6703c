//! Pad state machine for a touch front end
//!
//! The host UI owns the widgets. It forwards touches, d-pad drags and viewport changes here, and
//! supplies the [KeySink]s and [Haptics] the resulting events go to. The command line never builds
//! one.

use super::{
    button::{KeyBinding, VirtualButton},
    dpad::Direction,
    layout::{Orientation, Viewport},
    settings::{PadSize, SettingsStore, Theme},
};
use std::{
    collections::{BTreeSet, HashMap},
    error::Error,
    fmt::Display,
    time::Duration,
};

const PRESS_PULSE: Duration = Duration::from_millis(10);
const DPAD_PULSE: Duration = Duration::from_millis(8);

/// Identifier the platform gives a finger for as long as it touches the screen
pub type TouchId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

impl Display for KeyEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyEventKind::KeyDown => write!(f, "keydown"),
            KeyEventKind::KeyUp => write!(f, "keyup"),
        }
    }
}

/// Synthetic keyboard event, shaped like the ones a real keyboard would produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub kind: KeyEventKind,
    pub key: &'static str,
    pub code: &'static str,
    pub key_code: u32,
    pub which: u32,
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

impl KeyboardEvent {
    pub fn new(kind: KeyEventKind, binding: KeyBinding) -> Self {
        Self {
            kind,
            key: binding.key,
            code: binding.code,
            key_code: binding.key_code,
            which: binding.key_code,
            bubbles: true,
            cancelable: true,
            composed: true,
        }
    }
}

/// Somewhere key events get delivered, the emulator frame or the page around it
pub trait KeySink {
    fn name(&self) -> &str;

    fn dispatch(&self, event: &KeyboardEvent) -> Result<(), Box<dyn Error>>;
}

pub trait Haptics {
    fn vibrate(&self, duration: Duration);
}

pub struct GamepadOverlay {
    settings: SettingsStore,
    sinks: Vec<Box<dyn KeySink>>,
    haptics: Option<Box<dyn Haptics>>,
    pressed: BTreeSet<VirtualButton>,
    active_touches: HashMap<TouchId, VirtualButton>,
    dpad: Option<Direction>,
    active: bool,
    orientation: Orientation,
}

impl GamepadOverlay {
    /// Sinks receive every event in the order given, list the emulator frame first
    pub fn new(settings: SettingsStore, sinks: Vec<Box<dyn KeySink>>) -> Self {
        Self {
            settings,
            sinks,
            haptics: None,
            pressed: BTreeSet::new(),
            active_touches: HashMap::new(),
            dpad: None,
            active: false,
            orientation: Orientation::Portrait,
        }
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Some(Box::new(haptics));
        self
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn pressed(&self) -> impl Iterator<Item = VirtualButton> + '_ {
        self.pressed.iter().copied()
    }

    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn press(&mut self, touch: TouchId, button: VirtualButton) {
        self.active_touches.insert(touch, button);
        self.vibrate(PRESS_PULSE);

        if self.pressed.insert(button) {
            self.send(button, KeyEventKind::KeyDown);
        }
    }

    /// The key is only let go once no other finger is still holding the button
    pub fn release(&mut self, touch: TouchId, button: VirtualButton) {
        self.active_touches.remove(&touch);

        let still_held = self
            .active_touches
            .values()
            .any(|&held| held == button);

        if !still_held && self.pressed.remove(&button) {
            self.send(button, KeyEventKind::KeyUp);
        }
    }

    /// Finger slid across the d-pad, `x` and `y` are relative to its centre
    pub fn dpad_move(&mut self, x: f32, y: f32) {
        let direction = Direction::from_offset(x, y);

        if self.dpad == Some(direction) {
            return;
        }

        let previous: &[VirtualButton] = self.dpad.map(|dir| dir.buttons()).unwrap_or(&[]);
        let current = direction.buttons();

        for &button in previous.iter().filter(|button| !current.contains(*button)) {
            if self.pressed.remove(&button) {
                self.send(button, KeyEventKind::KeyUp);
            }
        }

        for &button in current {
            if self.pressed.insert(button) {
                self.send(button, KeyEventKind::KeyDown);
            }
        }

        self.dpad = Some(direction);
        self.vibrate(DPAD_PULSE);
    }

    pub fn dpad_end(&mut self) {
        if let Some(direction) = self.dpad.take() {
            for &button in direction.buttons() {
                if self.pressed.remove(&button) {
                    self.send(button, KeyEventKind::KeyUp);
                }
            }
        }
    }

    /// Releases everything, used when the pad is hidden mid press
    pub fn release_all(&mut self) {
        self.active_touches.clear();
        self.dpad = None;

        for button in std::mem::take(&mut self.pressed) {
            self.send(button, KeyEventKind::KeyUp);
        }
    }

    pub fn show(&mut self) {
        if self.settings.settings().visible {
            self.active = true;
        }
    }

    pub fn hide(&mut self) {
        self.release_all();
        self.active = false;
    }

    /// Follows the screen between phone and desktop sizes
    pub fn handle_resize(&mut self, viewport: &Viewport) {
        self.orientation = viewport.orientation();

        if !viewport.is_mobile() && self.active {
            self.hide();
        } else if viewport.is_mobile() && !self.active {
            self.show();
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if let Err(err) = self.settings.set_theme(theme) {
            tracing::warn!("Could not save gamepad settings: {}", err);
        }
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        if let Err(err) = self.settings.set_opacity(opacity) {
            tracing::warn!("Could not save gamepad settings: {}", err);
        }
    }

    pub fn set_size(&mut self, size: PadSize) {
        if let Err(err) = self.settings.set_size(size) {
            tracing::warn!("Could not save gamepad settings: {}", err);
        }
    }

    pub fn set_haptic(&mut self, haptic: bool) {
        if let Err(err) = self.settings.set_haptic(haptic) {
            tracing::warn!("Could not save gamepad settings: {}", err);
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if let Err(err) = self.settings.set_visible(visible) {
            tracing::warn!("Could not save gamepad settings: {}", err);
        }

        if visible {
            self.show();
        } else {
            self.hide();
        }
    }

    fn vibrate(&self, duration: Duration) {
        if !self.settings.settings().haptic {
            return;
        }

        if let Some(haptics) = &self.haptics {
            haptics.vibrate(duration);
        }
    }

    fn send(&self, button: VirtualButton, kind: KeyEventKind) {
        let event = KeyboardEvent::new(kind, button.binding());

        for sink in &self.sinks {
            if let Err(err) = sink.dispatch(&event) {
                tracing::warn!("Could not dispatch to {}: {}", sink.name(), err);
            }
        }

        tracing::debug!(
            "Gamepad {}: {} -> {} ({})",
            if kind == KeyEventKind::KeyDown {
                "pressed"
            } else {
                "released"
            },
            button,
            event.key,
            event.key_code
        );
    }
}
