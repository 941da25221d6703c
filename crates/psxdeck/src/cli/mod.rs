use clap::{Parser, Subcommand};
use gamepad::{gamepad_keymap, gamepad_settings, GamepadAction};
use library::{library_check, LibraryAction};
use psxdeck::{
    bridge::{LaunchBridge, ProcessFrame},
    config::GlobalConfig,
    controller::LibraryController,
    library::LibraryDatabase,
};
use rom::{
    delete::rom_delete, export::rom_export, import::rom_import, launch::rom_launch,
    list::rom_list, RomAction,
};
use std::{error::Error, path::PathBuf, sync::Arc};

pub mod gamepad;
pub mod library;
pub mod rom;

#[derive(Debug, Parser)]
#[command(version, about = "Local game library for an external PlayStation emulator")]
pub struct Cli {
    /// Config file to use instead of the one in the data directory
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub action: CliAction,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CliAction {
    #[command(about = Some("Commands relating to the games in the library"))]
    Rom {
        #[clap(subcommand)]
        action: RomAction,
    },
    #[command(about = Some("Commands relating to the library database itself"))]
    Library {
        #[clap(subcommand)]
        action: LibraryAction,
    },
    #[command(about = Some("Commands relating to the touch gamepad"))]
    Gamepad {
        #[clap(subcommand)]
        action: GamepadAction,
    },
}

pub async fn handle_cli(
    cli_action: CliAction,
    global_config: &GlobalConfig,
) -> Result<(), Box<dyn Error>> {
    match cli_action {
        CliAction::Rom { action } => {
            let mut controller = open_controller(global_config).await?;

            match action {
                RomAction::Import { paths } => rom_import(&mut controller, paths).await?,
                RomAction::List => rom_list(&controller).await?,
                RomAction::Delete { ids } => rom_delete(&controller, ids).await?,
                RomAction::Launch { rom } => rom_launch(&mut controller, rom).await?,
                RomAction::Export { id, output } => rom_export(&controller, id, output).await?,
            }
        }
        CliAction::Library { action } => {
            let controller = open_controller(global_config).await?;

            match action {
                LibraryAction::Check => library_check(&controller).await?,
            }
        }
        CliAction::Gamepad { action } => match action {
            GamepadAction::Keymap => gamepad_keymap(),
            GamepadAction::Settings(changes) => gamepad_settings(global_config, changes)?,
        },
    }

    Ok(())
}

async fn open_controller(
    global_config: &GlobalConfig,
) -> Result<LibraryController<ProcessFrame>, Box<dyn Error>> {
    let library = Arc::new(LibraryDatabase::new(Some(&global_config.database_file)));
    let frame = ProcessFrame::new(
        global_config.emulator_command.clone(),
        global_config.emulator_arguments.clone(),
        &global_config.cache_directory,
    );
    let mut controller = LibraryController::new(
        library,
        LaunchBridge::new(frame, global_config.launch_retry_delay),
    );

    controller.start().await?;

    Ok(controller)
}
