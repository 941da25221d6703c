use super::{format::RomFormat, id::RomId};
use chrono::{DateTime, Utc};
use native_db::native_db;
use native_db::ToKey;
use native_model::native_model;
use native_model::Model;
use serde::{Deserialize, Serialize};

/// Raw disk image, kept apart from [RomMetadata] so listing the library never loads it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct RomRecord {
    #[primary_key]
    pub id: RomId,
    pub payload: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct RomMetadata {
    #[primary_key]
    pub id: RomId,
    /// File name the image was imported from
    pub name: String,
    /// Length of the payload in bytes
    pub size: u64,
    pub added_date: DateTime<Utc>,
    pub last_played: Option<DateTime<Utc>>,
    pub format: RomFormat,
}
