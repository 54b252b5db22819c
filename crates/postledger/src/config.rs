//! Ledger configuration.

use std::path::Path;

use serde::Deserialize;

use postledger_store::StorageConfig;

use crate::error::Result;

/// Configuration for the Ledger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Refuse to append a post into a slot that is already occupied.
    ///
    /// An occupied slot means the post counter fell behind the stored posts,
    /// which only happens if a request was applied without its counter write.
    pub check_invariants: bool,
    /// Storage backend.
    pub storage: StorageConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            check_invariants: true,
            storage: StorageConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
