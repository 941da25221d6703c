use psxdeck::{
    bridge::EmulatorFrame,
    controller::{format_size, ImportOutcome, LibraryController},
};
use std::{error::Error, path::PathBuf};

pub async fn rom_import<F: EmulatorFrame>(
    controller: &mut LibraryController<F>,
    paths: Vec<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let outcomes = controller.import_paths(paths).await;
    let mut failures = 0;

    for outcome in outcomes {
        match outcome {
            ImportOutcome::Installed(metadata) => println!(
                "Installed {} ({}) as {}",
                metadata.name,
                format_size(metadata.size),
                metadata.id
            ),
            ImportOutcome::Rejected { message, .. } => eprintln!("{}", message),
            ImportOutcome::Failed { file_name, message } => {
                failures += 1;
                eprintln!("Could not import {}: {}", file_name, message);
            }
        }
    }

    println!("{}", controller.status());

    if failures > 0 {
        return Err(format!("{} file(s) could not be imported", failures).into());
    }

    Ok(())
}
