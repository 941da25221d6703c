use super::RomSpecification;
use psxdeck::{
    bridge::ProcessFrame,
    controller::{ImportOutcome, LibraryController},
};
use std::error::Error;

pub async fn rom_launch(
    controller: &mut LibraryController<ProcessFrame>,
    rom: RomSpecification,
) -> Result<(), Box<dyn Error>> {
    let id = match rom {
        RomSpecification::Stored(id) => id,
        RomSpecification::Import(path) => {
            let outcome = controller.import_paths([&path]).await.into_iter().next();

            match outcome {
                Some(ImportOutcome::Installed(metadata)) => metadata.id,
                Some(
                    ImportOutcome::Rejected { message, .. } | ImportOutcome::Failed { message, .. },
                ) => return Err(message.into()),
                None => return Err(format!("{} holds no files", path.display()).into()),
            }
        }
    };

    let result = controller.launch(id).await;
    println!("{}", controller.status());
    result?;

    // The emulator is stopped when the frame goes away, so stay around until it exits
    if let Some(status) = controller.bridge().frame().wait()? {
        tracing::info!("Emulator exited with {}", status);
    }

    Ok(())
}
