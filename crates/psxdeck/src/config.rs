use crate::bridge::DEFAULT_RETRY_DELAY;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use serde_with::{serde_as, DurationMilliSeconds};
use std::{
    fs::{create_dir_all, File},
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::LazyLock,
    time::Duration,
};

pub static STORAGE_DIRECTORY: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("psxdeck")
});

pub static CACHE_DIRECTORY: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("psxdeck")
});

pub static CONFIG_LOCATION: LazyLock<PathBuf> =
    LazyLock::new(|| STORAGE_DIRECTORY.join("config.ron"));

#[serde_as]
#[serde_inline_default]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde_inline_default(STORAGE_DIRECTORY.join("library"))]
    pub database_file: PathBuf,
    /// Gamepad preferences, kept out of the library database
    #[serde_inline_default(STORAGE_DIRECTORY.join("gamepad.ron"))]
    pub settings_file: PathBuf,
    /// Games are written here before the emulator is pointed at them
    #[serde_inline_default(CACHE_DIRECTORY.join("staging"))]
    pub cache_directory: PathBuf,
    #[serde(default)]
    pub emulator_command: Option<PathBuf>,
    #[serde(default)]
    pub emulator_arguments: Vec<String>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde_inline_default(DEFAULT_RETRY_DELAY)]
    pub launch_retry_delay: Duration,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            database_file: STORAGE_DIRECTORY.join("library"),
            settings_file: STORAGE_DIRECTORY.join("gamepad.ron"),
            cache_directory: CACHE_DIRECTORY.join("staging"),
            emulator_command: None,
            emulator_arguments: Vec::new(),
            launch_retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl GlobalConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let config_file = File::create(path)?;
        ron::ser::to_writer_pretty(config_file, self, PrettyConfig::default())?;

        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = File::open(path)?;
        let config = ron::de::from_reader(config_file)?;

        Ok(config)
    }

    /// Missing config is normal on first run, a broken one is reported and replaced by defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match File::open(path) {
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            _ => Self::load(path).unwrap_or_else(|err| {
                tracing::warn!("Could not read config at {}: {}", path.display(), err);
                Self::default()
            }),
        }
    }
}
