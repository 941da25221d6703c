use clap::Subcommand;
use psxdeck::{bridge::EmulatorFrame, controller::LibraryController};
use std::error::Error;

#[derive(Clone, Debug, Subcommand)]
pub enum LibraryAction {
    /// Removes disk images without metadata and metadata without disk images
    Check,
}

pub async fn library_check<F: EmulatorFrame>(
    controller: &LibraryController<F>,
) -> Result<(), Box<dyn Error>> {
    let report = controller.check().await?;

    if report.is_clean() {
        println!("Library is consistent");
        return Ok(());
    }

    for id in report.orphaned_roms {
        println!("Removed disk image without metadata: {}", id);
    }
    for id in report.orphaned_metadata {
        println!("Removed metadata without disk image: {}", id);
    }

    Ok(())
}
