use clap::Subcommand;
use psxdeck::library::RomId;
use std::{path::PathBuf, str::FromStr};

pub mod delete;
pub mod export;
pub mod import;
pub mod launch;
pub mod list;

/// What `rom launch` was pointed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RomSpecification {
    /// Already in the library
    Stored(RomId),
    /// A disk image that goes into the library right before it is launched
    Import(PathBuf),
}

impl FromStr for RomSpecification {
    type Err = String;

    fn from_str(argument: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = argument.parse() {
            return Ok(RomSpecification::Stored(id));
        }

        let path = PathBuf::from(argument);
        if path.is_file() {
            Ok(RomSpecification::Import(path))
        } else {
            Err(format!("{} is neither a library id nor a disk image", argument))
        }
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum RomAction {
    /// Adds disk images to the library, directories are searched recursively
    Import {
        #[clap(required=true, num_args=1..)]
        paths: Vec<PathBuf>,
    },
    /// Lists the library, newest first
    List,
    Delete {
        #[clap(required=true, num_args=1..)]
        ids: Vec<RomId>,
    },
    /// Starts the emulator on a game
    Launch { rom: RomSpecification },
    /// Writes a stored disk image back out to a file
    Export { id: RomId, output: PathBuf },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn launch_target_is_an_id_or_an_existing_file() {
        let directory = tempfile::tempdir().unwrap();
        let image = directory.path().join("game.bin");
        std::fs::write(&image, [0]).unwrap();
        let id = RomId::generate();

        assert_eq!(
            id.to_string().parse::<RomSpecification>(),
            Ok(RomSpecification::Stored(id))
        );
        assert_eq!(
            image.to_string_lossy().parse::<RomSpecification>(),
            Ok(RomSpecification::Import(image.clone()))
        );
        assert!(directory
            .path()
            .join("missing.bin")
            .to_string_lossy()
            .parse::<RomSpecification>()
            .is_err());
    }
}
