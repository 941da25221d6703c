use psxdeck::{
    bridge::EmulatorFrame,
    controller::LibraryController,
    library::{LibraryError, RomId},
};
use std::{error::Error, fs, path::PathBuf};

pub async fn rom_export<F: EmulatorFrame>(
    controller: &LibraryController<F>,
    id: RomId,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let payload = controller
        .library()
        .get_rom_data(id)
        .await?
        .ok_or(LibraryError::GameNotFound(id))?;

    fs::write(&output, &payload)?;
    tracing::info!("Exported {} ({} bytes) to {}", id, payload.len(), output.display());

    Ok(())
}
