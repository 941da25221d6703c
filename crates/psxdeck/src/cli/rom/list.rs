use psxdeck::{
    bridge::EmulatorFrame,
    controller::{LibraryController, LibraryView},
};
use std::error::Error;

pub async fn rom_list<F: EmulatorFrame>(
    controller: &LibraryController<F>,
) -> Result<(), Box<dyn Error>> {
    let LibraryView::Games(games) = controller.library_view().await? else {
        println!("Your library is empty, import a .bin disk image to get started");
        return Ok(());
    };

    for game in games {
        let last_played = game
            .metadata
            .last_played
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "{}  {:>9}  added {}  played {}  {}",
            game.metadata.id,
            game.size_label,
            game.metadata.added_date.format("%Y-%m-%d %H:%M"),
            last_played,
            game.metadata.name
        );
    }

    Ok(())
}
