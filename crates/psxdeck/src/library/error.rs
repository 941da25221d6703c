use super::id::RomId;
use crate::bridge::BridgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// The database file could not be opened or created
    #[error("Library storage is unavailable: {0}")]
    StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A read, write or delete was rejected by the database
    #[error("Library operation failed: {0}")]
    OperationFailed(#[from] native_db::db_type::Error),
    #[error("Library has not been initialized")]
    NotInitialized,
    #[error("Unsupported format: {file_name}. Only .bin is currently supported.")]
    UnsupportedFormat { file_name: String },
    #[error("No game with id {0} in the library")]
    GameNotFound(RomId),
    #[error("Emulator bridge failed: {0}")]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
