//! Local game library and touch controls for an external PlayStation emulator

pub mod bridge;
pub mod config;
pub mod controller;
pub mod gamepad;
pub mod library;
