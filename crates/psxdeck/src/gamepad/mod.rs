//! Touch gamepad that drives the emulator through synthetic key presses

pub mod button;
pub mod dpad;
pub mod layout;
pub mod overlay;
pub mod settings;

pub use button::{KeyBinding, VirtualButton};
pub use dpad::Direction;
pub use overlay::{GamepadOverlay, KeySink, KeyboardEvent};
pub use settings::{GamepadSettings, SettingsStore};
