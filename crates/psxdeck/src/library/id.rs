use native_db::ToKey;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Random identifier handed out when a game is imported, never reused
pub struct RomId(Uuid);

impl RomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl ToKey for RomId {
    fn to_key(&self) -> native_db::Key {
        native_db::Key::new(self.0.as_bytes().to_vec())
    }

    fn key_names() -> Vec<String> {
        vec!["romid".to_string()]
    }
}

impl Display for RomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for RomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = RomId::generate();
        let b = RomId::generate();

        assert_ne!(a, b);
    }

    #[test]
    fn display_parses_back() {
        let id = RomId::generate();
        let parsed: RomId = id.to_string().parse().unwrap();

        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-an-id".parse::<RomId>().is_err());
    }
}
