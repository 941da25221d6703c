use clap::{Args, Subcommand};
use psxdeck::{
    config::GlobalConfig,
    gamepad::{
        settings::{PadSize, Theme},
        SettingsStore, VirtualButton,
    },
};
use std::error::Error;
use strum::IntoEnumIterator;

#[derive(Clone, Debug, Subcommand)]
pub enum GamepadAction {
    /// Shows which key every gamepad button sends
    Keymap,
    /// Shows the gamepad settings, changing any that are given
    Settings(SettingsChanges),
}

#[derive(Clone, Debug, Args)]
pub struct SettingsChanges {
    #[clap(long)]
    pub theme: Option<Theme>,
    #[clap(long, value_parser = clap::value_parser!(u8).range(30..=100))]
    pub opacity: Option<u8>,
    #[clap(long)]
    pub size: Option<PadSize>,
    #[clap(long)]
    pub haptic: Option<bool>,
    #[clap(long)]
    pub visible: Option<bool>,
}

pub fn gamepad_keymap() {
    for button in VirtualButton::iter() {
        let binding = button.binding();
        println!(
            "{:<8} {:<10} {:<10} {}",
            button, binding.key, binding.code, binding.key_code
        );
    }
}

pub fn gamepad_settings(
    global_config: &GlobalConfig,
    changes: SettingsChanges,
) -> Result<(), Box<dyn Error>> {
    let mut store = SettingsStore::open(&global_config.settings_file);

    if let Some(theme) = changes.theme {
        store.set_theme(theme)?;
    }
    if let Some(opacity) = changes.opacity {
        store.set_opacity(opacity)?;
    }
    if let Some(size) = changes.size {
        store.set_size(size)?;
    }
    if let Some(haptic) = changes.haptic {
        store.set_haptic(haptic)?;
    }
    if let Some(visible) = changes.visible {
        store.set_visible(visible)?;
    }

    let settings = store.settings();
    println!("theme:   {}", settings.theme);
    println!("opacity: {}%", settings.opacity);
    println!("size:    {}", settings.size);
    println!("haptic:  {}", settings.haptic);
    println!("visible: {}", settings.visible);

    Ok(())
}
