//! Display preferences for the touch gamepad, stored on their own away from the game library

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use std::{
    fs::{create_dir_all, File},
    io::ErrorKind,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

pub const OPACITY_RANGE: RangeInclusive<u8> = 30..=100;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Malformed gamepad settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Could not write gamepad settings: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(
    Serialize,
    Deserialize,
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Modern,
    Classic,
    Neon,
    Minimal,
}

#[derive(
    Serialize,
    Deserialize,
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PadSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[serde_inline_default]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadSettings {
    #[serde(default)]
    pub theme: Theme,
    /// Percent, kept within [OPACITY_RANGE]
    #[serde_inline_default(85)]
    pub opacity: u8,
    #[serde(default)]
    pub size: PadSize,
    #[serde_inline_default(true)]
    pub haptic: bool,
    #[serde_inline_default(true)]
    pub visible: bool,
}

impl Default for GamepadSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            opacity: 85,
            size: PadSize::default(),
            haptic: true,
            visible: true,
        }
    }
}

impl GamepadSettings {
    /// Reads the settings, falling back to defaults if they are missing or damaged
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::try_load(path) {
            Ok(settings) => settings.validated(),
            Err(SettingsError::Io(err)) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!(
                    "Ignoring gamepad settings at {}: {}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings_file = File::open(path)?;
        let settings = ron::de::from_reader(settings_file)?;

        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let settings_file = File::create(path)?;
        ron::ser::to_writer_pretty(settings_file, self, PrettyConfig::default())?;

        Ok(())
    }

    pub fn validated(mut self) -> Self {
        self.opacity = clamp_opacity(self.opacity);
        self
    }
}

fn clamp_opacity(opacity: u8) -> u8 {
    opacity.clamp(*OPACITY_RANGE.start(), *OPACITY_RANGE.end())
}

/// Current settings plus where they get written back to after every change
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: GamepadSettings,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        Self {
            settings: GamepadSettings::load(&path),
            path: Some(path),
        }
    }

    /// Never touches the disk
    pub fn in_memory(settings: GamepadSettings) -> Self {
        Self {
            path: None,
            settings: settings.validated(),
        }
    }

    pub fn settings(&self) -> &GamepadSettings {
        &self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SettingsError> {
        self.settings.theme = theme;
        self.save()
    }

    pub fn set_opacity(&mut self, opacity: u8) -> Result<(), SettingsError> {
        self.settings.opacity = clamp_opacity(opacity);
        self.save()
    }

    pub fn set_size(&mut self, size: PadSize) -> Result<(), SettingsError> {
        self.settings.size = size;
        self.save()
    }

    pub fn set_haptic(&mut self, haptic: bool) -> Result<(), SettingsError> {
        self.settings.haptic = haptic;
        self.save()
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<(), SettingsError> {
        self.settings.visible = visible;
        self.save()
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        match &self.path {
            Some(path) => self.settings.save(path),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_gives_defaults() {
        let directory = tempfile::tempdir().unwrap();

        let settings = GamepadSettings::load(directory.path().join("gamepad.ron"));

        assert_eq!(settings, GamepadSettings::default());
        assert_eq!(settings.theme, Theme::Modern);
        assert_eq!(settings.opacity, 85);
        assert_eq!(settings.size, PadSize::Medium);
        assert!(settings.haptic);
        assert!(settings.visible);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("gamepad.ron");
        fs::write(&path, "{ this is not ron").unwrap();

        assert_eq!(GamepadSettings::load(&path), GamepadSettings::default());
    }

    #[test]
    fn missing_fields_are_filled() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("gamepad.ron");
        fs::write(&path, "(theme: neon, haptic: false)").unwrap();

        let settings = GamepadSettings::load(&path);

        assert_eq!(settings.theme, Theme::Neon);
        assert!(!settings.haptic);
        assert_eq!(settings.opacity, 85);
        assert_eq!(settings.size, PadSize::Medium);
        assert!(settings.visible);
    }

    #[test]
    fn opacity_is_clamped() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("gamepad.ron");
        fs::write(&path, "(opacity: 5)").unwrap();

        assert_eq!(GamepadSettings::load(&path).opacity, 30);

        let mut store = SettingsStore::in_memory(GamepadSettings::default());
        store.set_opacity(250).unwrap();
        assert_eq!(store.settings().opacity, 100);
    }

    #[test]
    fn every_change_is_saved() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("settings").join("gamepad.ron");
        let mut store = SettingsStore::open(&path);

        store.set_theme(Theme::Classic).unwrap();
        store.set_size(PadSize::Large).unwrap();
        store.set_opacity(60).unwrap();
        store.set_visible(false).unwrap();

        let reloaded = GamepadSettings::try_load(&path).unwrap();
        assert_eq!(&reloaded, store.settings());
        assert_eq!(reloaded.theme, Theme::Classic);
        assert_eq!(reloaded.opacity, 60);
    }

    #[test]
    fn names_parse() {
        assert_eq!("minimal".parse::<Theme>().unwrap(), Theme::Minimal);
        assert_eq!("small".parse::<PadSize>().unwrap(), PadSize::Small);
        assert!("huge".parse::<PadSize>().is_err());
    }
}
