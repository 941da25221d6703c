//! Persistent game library
//!
//! Disk images and their descriptive fields live in two tables of one `native_db` database. Both
//! tables are always written in the same transaction so a game is never half imported or half
//! deleted.

use chrono::{DateTime, TimeDelta, Utc};
use std::{
    collections::HashSet,
    fs::create_dir_all,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tokio::sync::OnceCell;

pub mod error;
pub mod format;
pub mod id;
pub mod record;

pub use error::LibraryError;
pub use format::RomFormat;
pub use id::RomId;
pub use record::{RomMetadata, RomRecord};

static DATABASE_MODELS: LazyLock<native_db::Models> = LazyLock::new(|| {
    let mut models = native_db::Models::new();
    models
        .define::<RomRecord>()
        .expect("rom table definition is static");
    models
        .define::<RomMetadata>()
        .expect("metadata table definition is static");
    models
});

/// Ids removed by [LibraryDatabase::reconcile]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Disk images that had no metadata
    pub orphaned_roms: Vec<RomId>,
    /// Metadata that pointed at a missing disk image
    pub orphaned_metadata: Vec<RomId>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_roms.is_empty() && self.orphaned_metadata.is_empty()
    }
}

pub struct LibraryDatabase {
    location: Option<PathBuf>,
    database: OnceCell<native_db::Database<'static>>,
}

impl LibraryDatabase {
    /// Prepares a client for the database at `location`, or an in memory one if there is none
    ///
    /// Nothing is touched on disk until [Self::initialize]
    pub fn new(location: Option<&Path>) -> Self {
        Self {
            location: location.map(Path::to_path_buf),
            database: OnceCell::new(),
        }
    }

    /// Opens the database, creating it on first use. Calling this again is a no-op
    pub async fn initialize(&self) -> Result<(), LibraryError> {
        self.database
            .get_or_try_init(|| async { self.open() })
            .await?;

        Ok(())
    }

    fn open(&self) -> Result<native_db::Database<'static>, LibraryError> {
        let builder = native_db::Builder::new();

        let database = if let Some(path) = &self.location {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)
                    .map_err(|err| LibraryError::StorageUnavailable(err.into()))?;
            }

            tracing::info!("Opening game library at {}", path.display());
            builder.create(&DATABASE_MODELS, path)
        } else {
            tracing::info!("Opening in memory game library");
            builder.create_in_memory(&DATABASE_MODELS)
        };

        database.map_err(|err| LibraryError::StorageUnavailable(err.into()))
    }

    fn database(&self) -> Result<&native_db::Database<'static>, LibraryError> {
        self.database.get().ok_or(LibraryError::NotInitialized)
    }

    /// Stores a new game and returns its metadata
    ///
    /// The payload must already be fully in memory, nothing here streams
    pub async fn save_rom(
        &self,
        file_name: &str,
        size_bytes: u64,
        payload: Vec<u8>,
    ) -> Result<RomMetadata, LibraryError> {
        let database = self.database()?;

        if size_bytes != payload.len() as u64 {
            tracing::warn!(
                "{} claims to be {} bytes but {} were read",
                file_name,
                size_bytes,
                payload.len()
            );
        }

        let id = RomId::generate();
        let metadata = RomMetadata {
            id,
            name: file_name.to_string(),
            size: size_bytes,
            added_date: Utc::now(),
            last_played: None,
            format: RomFormat::Bin,
        };

        let transaction = database.rw_transaction()?;
        transaction.insert(RomRecord { id, payload })?;
        transaction.insert(metadata.clone())?;
        transaction.commit()?;

        tracing::info!("Saved {} ({} bytes) as {}", metadata.name, metadata.size, id);

        Ok(metadata)
    }

    /// Every metadata record in no particular order
    pub async fn get_all_metadata(&self) -> Result<Vec<RomMetadata>, LibraryError> {
        let database = self.database()?;
        let transaction = database.r_transaction()?;

        let metadata: Result<Vec<RomMetadata>, native_db::db_type::Error> = transaction
            .scan()
            .primary::<RomMetadata>()?
            .all()?
            .collect();

        Ok(metadata?)
    }

    pub async fn get_metadata(&self, id: RomId) -> Result<Option<RomMetadata>, LibraryError> {
        let database = self.database()?;
        let transaction = database.r_transaction()?;

        Ok(transaction.get().primary::<RomMetadata>(id)?)
    }

    pub async fn get_rom_data(&self, id: RomId) -> Result<Option<Vec<u8>>, LibraryError> {
        let database = self.database()?;
        let transaction = database.r_transaction()?;

        Ok(transaction
            .get()
            .primary::<RomRecord>(id)?
            .map(|record| record.payload))
    }

    /// Removes both halves of a game, missing halves are skipped
    pub async fn delete_game(&self, id: RomId) -> Result<(), LibraryError> {
        let database = self.database()?;
        let transaction = database.rw_transaction()?;

        // Removal needs the full item to clear its keys
        if let Some(record) = transaction.get().primary::<RomRecord>(id)? {
            transaction.remove(record)?;
        }

        if let Some(metadata) = transaction.get().primary::<RomMetadata>(id)? {
            transaction.remove(metadata)?;
        }

        transaction.commit()?;

        tracing::info!("Deleted {} from the library", id);

        Ok(())
    }

    /// Stamps the game as played now, unknown ids are ignored
    pub async fn update_last_played(&self, id: RomId) -> Result<(), LibraryError> {
        let database = self.database()?;
        let transaction = database.rw_transaction()?;

        let Some(mut metadata) = transaction.get().primary::<RomMetadata>(id)? else {
            return Ok(());
        };

        metadata.last_played = Some(next_timestamp(metadata.last_played));
        transaction.upsert(metadata)?;
        transaction.commit()?;

        Ok(())
    }

    /// Removes disk images without metadata and metadata without disk images
    pub async fn reconcile(&self) -> Result<ReconcileReport, LibraryError> {
        let database = self.database()?;
        let transaction = database.rw_transaction()?;

        // Only ids are kept, payloads are dropped as the scan goes
        let rom_ids: Result<HashSet<RomId>, native_db::db_type::Error> = transaction
            .scan()
            .primary::<RomRecord>()?
            .all()?
            .map(|record| record.map(|record| record.id))
            .collect();
        let rom_ids = rom_ids?;

        let metadata: Result<Vec<RomMetadata>, native_db::db_type::Error> = transaction
            .scan()
            .primary::<RomMetadata>()?
            .all()?
            .collect();
        let metadata = metadata?;

        let metadata_ids: HashSet<RomId> = metadata.iter().map(|metadata| metadata.id).collect();
        let mut report = ReconcileReport::default();

        for metadata in metadata {
            if !rom_ids.contains(&metadata.id) {
                report.orphaned_metadata.push(metadata.id);
                transaction.remove(metadata)?;
            }
        }

        for id in rom_ids.difference(&metadata_ids) {
            if let Some(record) = transaction.get().primary::<RomRecord>(*id)? {
                report.orphaned_roms.push(*id);
                transaction.remove(record)?;
            }
        }

        transaction.commit()?;

        report.orphaned_roms.sort();
        report.orphaned_metadata.sort();

        Ok(report)
    }

    /// Writes a disk image without its metadata, only for recreating damaged libraries in tests
    #[cfg(test)]
    pub(crate) async fn insert_raw(
        &self,
        record: Option<RomRecord>,
        metadata: Option<RomMetadata>,
    ) -> Result<(), LibraryError> {
        let transaction = self.database()?.rw_transaction()?;

        if let Some(record) = record {
            transaction.insert(record)?;
        }

        if let Some(metadata) = metadata {
            transaction.insert(metadata)?;
        }

        transaction.commit()?;

        Ok(())
    }
}

/// The clock may not have moved since the last stamp, the stamp must still go forward
fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();

    match previous {
        Some(previous) if now <= previous => previous + TimeDelta::microseconds(1),
        _ => now,
    }
}
