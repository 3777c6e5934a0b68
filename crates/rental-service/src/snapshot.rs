//! Whole-store snapshots.
//!
//! A [`Snapshot`] is every record of the four stores, written as one JSON document. The
//! service keeps its data in memory; snapshots carry it across restarts, and a restored
//! system re-runs expiry so reservations that ran out while it was down are released.

use crate::model::{InventoryItem, Pendency, Product, Rental};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub items: Vec<InventoryItem>,
    pub rentals: Vec<Rental>,
    pub pendencies: Vec<Pendency>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.items.is_empty()
            && self.rentals.is_empty()
            && self.pendencies.is_empty()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the snapshot to `path`, replacing any previous file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Like [`Snapshot::load`], but a missing file is an empty snapshot.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        match Self::load(path) {
            Err(SnapshotError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}
