//! Ties the library to the emulator in response to user actions

use crate::{
    bridge::{EmulatorFrame, LaunchBridge, NamedBlob},
    library::{LibraryDatabase, LibraryError, ReconcileReport, RomFormat, RomId, RomMetadata},
};
use itertools::Itertools;
use std::{
    cmp::Reverse,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use walkdir::WalkDir;

/// The one line status display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    Installing,
    Loading,
    Running(String),
    Error,
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ready => write!(f, "SYSTEM READY"),
            Status::Installing => write!(f, "INSTALLING GAMES..."),
            Status::Loading => write!(f, "LOADING DISK IMAGE..."),
            Status::Running(name) => write!(f, "RUNNING: {}", name),
            Status::Error => write!(f, "ERROR LOADING GAME"),
        }
    }
}

/// A file picked or dropped by the user, already read into memory
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Installed(RomMetadata),
    /// Never reached storage, the message is meant for the user
    Rejected { file_name: String, message: String },
    /// A supported file that could not be read or stored, the rest of the batch still went on
    Failed { file_name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub metadata: RomMetadata,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryView {
    Empty,
    /// Newest first
    Games(Vec<GameEntry>),
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

pub struct LibraryController<F> {
    library: Arc<LibraryDatabase>,
    bridge: LaunchBridge<F>,
    status: Status,
}

impl<F: EmulatorFrame> LibraryController<F> {
    pub fn new(library: Arc<LibraryDatabase>, bridge: LaunchBridge<F>) -> Self {
        Self {
            library,
            bridge,
            status: Status::default(),
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn library(&self) -> &LibraryDatabase {
        &self.library
    }

    pub fn bridge(&self) -> &LaunchBridge<F> {
        &self.bridge
    }

    /// Opens the library and lists it
    pub async fn start(&mut self) -> Result<LibraryView, LibraryError> {
        self.library.initialize().await?;

        self.status = Status::Ready;
        self.library_view().await
    }

    /// Repairs half stored games
    ///
    /// Every disk image gets read, so this only runs when asked for
    pub async fn check(&self) -> Result<ReconcileReport, LibraryError> {
        let report = self.library.reconcile().await?;

        for id in &report.orphaned_roms {
            tracing::warn!("Removed disk image {} that had no metadata", id);
        }
        for id in &report.orphaned_metadata {
            tracing::warn!("Removed metadata {} that had no disk image", id);
        }

        Ok(report)
    }

    pub async fn library_view(&self) -> Result<LibraryView, LibraryError> {
        let games = self.library.get_all_metadata().await?;

        if games.is_empty() {
            return Ok(LibraryView::Empty);
        }

        Ok(LibraryView::Games(
            games
                .into_iter()
                .sorted_by_key(|metadata| Reverse(metadata.added_date))
                .map(|metadata| GameEntry {
                    size_label: format_size(metadata.size),
                    metadata,
                })
                .collect(),
        ))
    }

    /// Installs files one after another, rejecting anything that isn't a supported disk image
    ///
    /// There is one outcome per file, a file that fails does not stop the ones after it
    pub async fn import_files(
        &mut self,
        files: impl IntoIterator<Item = ImportFile>,
    ) -> Vec<ImportOutcome> {
        self.status = Status::Installing;
        let mut outcomes = Vec::new();

        for file in files {
            let outcome = match RomFormat::from_file_name(&file.name) {
                Ok(_) => self.install(&file.name, Ok(file.bytes)).await,
                Err(err) => reject(&file.name, err),
            };

            outcomes.push(outcome);
        }

        self.status = Status::Ready;
        outcomes
    }

    /// Like [Self::import_files] but reads from disk, walking into directories
    ///
    /// Files are only read once their name passed the format check
    pub async fn import_paths(
        &mut self,
        paths: impl IntoIterator<Item = impl AsRef<Path>>,
    ) -> Vec<ImportOutcome> {
        self.status = Status::Installing;
        let mut outcomes = Vec::new();

        for path in paths {
            let path = path.as_ref();

            let files = match collect_files(path) {
                Ok(files) => files,
                Err(err) => {
                    outcomes.push(fail(&path.display().to_string(), err));
                    continue;
                }
            };

            for file in files {
                let file_name = file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();

                let outcome = match RomFormat::from_file_name(&file_name) {
                    Ok(_) => {
                        tracing::info!("Importing {}", file.display());
                        self.install(&file_name, fs::read(&file)).await
                    }
                    Err(err) => reject(&file_name, err),
                };

                outcomes.push(outcome);
            }
        }

        self.status = Status::Ready;
        outcomes
    }

    async fn install(&self, name: &str, bytes: std::io::Result<Vec<u8>>) -> ImportOutcome {
        let stored = match bytes {
            Ok(bytes) => {
                let size = bytes.len() as u64;
                self.library.save_rom(name, size, bytes).await
            }
            Err(err) => Err(err.into()),
        };

        match stored {
            Ok(metadata) => ImportOutcome::Installed(metadata),
            Err(err) => fail(name, err),
        }
    }

    pub async fn delete_game(&self, id: RomId) -> Result<(), LibraryError> {
        self.library.delete_game(id).await
    }

    /// Loads a game into the emulator and marks it as played
    pub async fn launch(&mut self, id: RomId) -> Result<(), LibraryError> {
        self.status = Status::Loading;

        match self.try_launch(id).await {
            Ok(name) => {
                self.status = Status::Running(name);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Launch error: {}", err);
                self.status = Status::Error;
                Err(err)
            }
        }
    }

    async fn try_launch(&self, id: RomId) -> Result<String, LibraryError> {
        let payload = self
            .library
            .get_rom_data(id)
            .await?
            .ok_or(LibraryError::GameNotFound(id))?;
        let metadata = self
            .library
            .get_metadata(id)
            .await?
            .ok_or(LibraryError::GameNotFound(id))?;

        self.library.update_last_played(id).await?;
        self.bridge
            .deliver(NamedBlob::new(metadata.name.clone(), payload))
            .await?;

        Ok(metadata.name)
    }

    pub fn reset(&self) -> bool {
        self.bridge.reset()
    }

    pub fn toggle_sound(&self) -> bool {
        self.bridge.toggle_sound()
    }
}

fn reject(file_name: &str, err: LibraryError) -> ImportOutcome {
    tracing::warn!("{}", err);

    ImportOutcome::Rejected {
        file_name: file_name.to_string(),
        message: err.to_string(),
    }
}

fn fail(file_name: &str, err: LibraryError) -> ImportOutcome {
    tracing::error!("Could not import {}: {}", file_name, err);

    ImportOutcome::Failed {
        file_name: file_name.to_string(),
        message: err.to_string(),
    }
}

fn collect_files(path: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bridge::{test::MockFrame, DEFAULT_RETRY_DELAY};

    async fn controller(frame: MockFrame) -> LibraryController<MockFrame> {
        let library = Arc::new(LibraryDatabase::new(None));
        let mut controller =
            LibraryController::new(library, LaunchBridge::new(frame, DEFAULT_RETRY_DELAY));
        controller.start().await.unwrap();
        controller
    }

    fn file(name: &str, bytes: Vec<u8>) -> ImportFile {
        ImportFile {
            name: name.to_string(),
            bytes,
        }
    }

    fn installed(outcome: &ImportOutcome) -> &RomMetadata {
        match outcome {
            ImportOutcome::Installed(metadata) => metadata,
            ImportOutcome::Rejected { message, .. } | ImportOutcome::Failed { message, .. } => {
                panic!("not installed: {message}")
            }
        }
    }

    #[tokio::test]
    async fn empty_library() {
        let controller = controller(MockFrame::default()).await;

        assert_eq!(controller.library_view().await.unwrap(), LibraryView::Empty);
        assert_eq!(controller.status().to_string(), "SYSTEM READY");
    }

    #[tokio::test]
    async fn import_bin() {
        let mut controller = controller(MockFrame::default()).await;

        let outcomes = controller.import_files([file("game1.bin", (0..10).collect())]).await;
        let metadata = installed(&outcomes[0]);

        assert_eq!(metadata.size, 10);
        assert_eq!(metadata.format, RomFormat::Bin);
        assert_eq!(
            controller.library().get_rom_data(metadata.id).await.unwrap(),
            Some((0..10).collect())
        );
        assert_eq!(*controller.status(), Status::Ready);
    }

    #[tokio::test]
    async fn import_iso_is_rejected() {
        let mut controller = controller(MockFrame::default()).await;

        let outcomes = controller.import_files([file("game.iso", vec![1, 2, 3])]).await;

        assert_eq!(
            outcomes,
            vec![ImportOutcome::Rejected {
                file_name: "game.iso".to_string(),
                message: "Unsupported format: game.iso. Only .bin is currently supported."
                    .to_string(),
            }]
        );
        assert!(controller
            .library()
            .get_all_metadata()
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let mut controller = controller(MockFrame::default()).await;

        controller.import_files([file("old.bin", vec![0; 1024 * 1024])]).await;
        controller.import_files([file("new.bin", vec![0; 3 * 1024 * 1024 / 2])]).await;

        let LibraryView::Games(games) = controller.library_view().await.unwrap() else {
            panic!("library should not be empty");
        };

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].metadata.name, "new.bin");
        assert_eq!(games[0].size_label, "1.5 MB");
        assert_eq!(games[1].metadata.name, "old.bin");
        assert_eq!(games[1].size_label, "1.0 MB");
    }

    #[tokio::test]
    async fn import_paths_walks_directories() {
        let directory = tempfile::tempdir().unwrap();
        fs::create_dir(directory.path().join("disc")).unwrap();
        fs::write(directory.path().join("disc").join("game.bin"), [1, 2]).unwrap();
        fs::write(directory.path().join("game.cue"), "FILE").unwrap();
        let mut controller = controller(MockFrame::default()).await;

        let outcomes = controller.import_paths([directory.path()]).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(installed(&outcomes[0]).name, "game.bin");
        assert!(matches!(&outcomes[1], ImportOutcome::Rejected { file_name, .. } if file_name == "game.cue"));
    }

    #[tokio::test]
    async fn failed_file_does_not_hide_the_rest_of_the_batch() {
        let directory = tempfile::tempdir().unwrap();
        let good = directory.path().join("good.bin");
        fs::write(&good, [1, 2, 3]).unwrap();
        let missing = directory.path().join("missing.bin");
        let later = directory.path().join("later.bin");
        fs::write(&later, [4]).unwrap();
        let mut controller = controller(MockFrame::default()).await;

        let outcomes = controller.import_paths([&good, &missing, &later]).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(installed(&outcomes[0]).name, "good.bin");
        assert!(matches!(&outcomes[1], ImportOutcome::Failed { file_name, .. } if file_name == "missing.bin"));
        assert_eq!(installed(&outcomes[2]).name, "later.bin");
        assert_eq!(controller.library().get_all_metadata().await.unwrap().len(), 2);
        assert_eq!(*controller.status(), Status::Ready);
    }

    #[tokio::test]
    async fn storage_failure_is_reported_per_file() {
        let library = Arc::new(LibraryDatabase::new(None));
        let mut controller = LibraryController::new(
            library,
            LaunchBridge::new(MockFrame::default(), DEFAULT_RETRY_DELAY),
        );

        let outcomes = controller
            .import_files([file("a.bin", vec![1]), file("b.iso", vec![2])])
            .await;

        assert!(matches!(&outcomes[0], ImportOutcome::Failed { file_name, message }
            if file_name == "a.bin" && message == &LibraryError::NotInitialized.to_string()));
        assert!(matches!(&outcomes[1], ImportOutcome::Rejected { .. }));
        assert_eq!(*controller.status(), Status::Ready);
    }

    #[tokio::test]
    async fn check_repairs_what_start_leaves_alone() {
        let library = Arc::new(LibraryDatabase::new(None));
        library.initialize().await.unwrap();
        let lonely = RomId::generate();
        library
            .insert_raw(
                Some(crate::library::RomRecord {
                    id: lonely,
                    payload: vec![1],
                }),
                None,
            )
            .await
            .unwrap();
        let mut controller = LibraryController::new(
            library,
            LaunchBridge::new(MockFrame::default(), DEFAULT_RETRY_DELAY),
        );

        assert_eq!(controller.start().await.unwrap(), LibraryView::Empty);
        assert_eq!(
            controller.library().get_rom_data(lonely).await.unwrap(),
            Some(vec![1])
        );

        let report = controller.check().await.unwrap();

        assert_eq!(report.orphaned_roms, vec![lonely]);
        assert_eq!(controller.library().get_rom_data(lonely).await.unwrap(), None);
    }

    #[tokio::test]
    async fn launch_hands_over_payload() {
        let mut controller = controller(MockFrame::default()).await;
        let outcomes = controller.import_files([file("game.bin", vec![5, 6, 7])]).await;
        let id = installed(&outcomes[0]).id;

        controller.launch(id).await.unwrap();

        let loaded = controller.bridge().frame().loaded.borrow().clone();
        assert_eq!(loaded, vec![NamedBlob::new("game.bin", vec![5, 6, 7])]);
        assert_eq!(controller.status().to_string(), "RUNNING: game.bin");
        assert!(controller
            .library()
            .get_metadata(id)
            .await
            .unwrap()
            .unwrap()
            .last_played
            .is_some());
    }

    #[tokio::test]
    async fn launch_unknown_game() {
        let mut controller = controller(MockFrame::default()).await;

        let result = controller.launch(RomId::generate()).await;

        assert!(matches!(result, Err(LibraryError::GameNotFound(_))));
        assert_eq!(controller.status().to_string(), "ERROR LOADING GAME");
    }

    #[tokio::test(start_paused = true)]
    async fn launch_fails_when_emulator_never_comes_up() {
        let mut controller = controller(MockFrame::ready_after(2)).await;
        let outcomes = controller.import_files([file("game.bin", vec![1])]).await;

        let result = controller.launch(installed(&outcomes[0]).id).await;

        assert!(matches!(result, Err(LibraryError::Bridge(_))));
        assert_eq!(*controller.status(), Status::Error);
    }

    #[tokio::test]
    async fn delete_removes_from_listing() {
        let mut controller = controller(MockFrame::default()).await;
        let outcomes = controller
            .import_files([file("a.bin", vec![1]), file("b.bin", vec![2])])
            .await;

        controller
            .delete_game(installed(&outcomes[0]).id)
            .await
            .unwrap();

        let LibraryView::Games(games) = controller.library_view().await.unwrap() else {
            panic!("library should not be empty");
        };
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].metadata.name, "b.bin");
    }
}
