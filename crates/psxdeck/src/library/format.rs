use super::error::LibraryError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Disk image formats the library will accept
#[derive(
    Serialize,
    Deserialize,
    Default,
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
#[strum(serialize_all = "lowercase")]
pub enum RomFormat {
    /// Raw CD image
    #[default]
    Bin,
}

impl RomFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            RomFormat::Bin => "bin",
        }
    }

    /// Checks the file name alone, contents are never inspected
    pub fn from_file_name(file_name: &str) -> Result<Self, LibraryError> {
        let lowercase = file_name.to_lowercase();

        RomFormat::iter()
            .find(|format| {
                lowercase
                    .strip_suffix(format.extension())
                    .is_some_and(|stem| stem.ends_with('.'))
            })
            .ok_or_else(|| LibraryError::UnsupportedFormat {
                file_name: file_name.to_string(),
            })
    }
}
