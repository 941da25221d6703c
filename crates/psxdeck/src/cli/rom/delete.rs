use psxdeck::{bridge::EmulatorFrame, controller::LibraryController, library::RomId};
use std::error::Error;

pub async fn rom_delete<F: EmulatorFrame>(
    controller: &LibraryController<F>,
    ids: Vec<RomId>,
) -> Result<(), Box<dyn Error>> {
    for id in ids {
        let name = controller
            .library()
            .get_metadata(id)
            .await?
            .map(|metadata| metadata.name);

        controller.delete_game(id).await?;

        match name {
            Some(name) => println!("Deleted {} from your local library", name),
            None => tracing::warn!("{} was not in the library", id),
        }
    }

    Ok(())
}
