//! Packing list collection.
//!
//! Items reference their itinerary by ID only; the itinerary is not required
//! to exist.

use crate::error::Result;
use crate::ids::IdGenerator;
use crate::repository::{JsonFileRepository, LoadReport, Repository};
use crate::store::RecordStore;
use crate::types::{require_text, validate_quantity, PackingItem};
use std::path::PathBuf;

/// Owns the packing item collection file
pub struct PackingStore {
    records: RecordStore<PackingItem>,
    ids: IdGenerator,
}

impl PackingStore {
    pub fn new(repo: impl Repository<PackingItem> + 'static, ids: IdGenerator) -> Self {
        Self {
            records: RecordStore::new(repo),
            ids,
        }
    }

    /// Store backed by the JSON file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileRepository::new(path), IdGenerator::default())
    }

    pub fn load_all(&self) -> Result<Vec<PackingItem>> {
        self.records.load_all()
    }

    pub fn load_report(&self) -> Result<LoadReport<PackingItem>> {
        self.records.load_report()
    }

    pub fn save_all(&self, items: &[PackingItem]) -> Result<()> {
        self.records.save_all(items)
    }

    pub fn add_item(&self, itinerary_id: &str, name: &str, quantity: u32) -> Result<PackingItem> {
        let itinerary_id = require_text("Itinerary ID", itinerary_id)?;
        let name = require_text("Item name", name)?;
        validate_quantity(quantity)?;

        let item = PackingItem {
            id: self.ids.packing_id(),
            itinerary_id,
            name,
            quantity,
            packed: false,
        };

        let item = self.records.append(item)?;
        tracing::info!(
            "Added packing item {} ({}x {}) to itinerary {}",
            item.id,
            item.quantity,
            item.name,
            item.itinerary_id
        );
        Ok(item)
    }

    pub fn find(&self, item_id: &str) -> Result<PackingItem> {
        self.records.find(item_id)
    }

    /// Items for one itinerary, in storage order
    pub fn list_items(&self, itinerary_id: &str) -> Result<Vec<PackingItem>> {
        self.records.filter(|item| item.itinerary_id == itinerary_id)
    }

    /// Flip the packed flag and return the new state
    pub fn mark_packed(&self, item_id: &str) -> Result<bool> {
        let packed = self.records.modify(item_id, |item| {
            item.packed = !item.packed;
            Ok((item.packed, true))
        })?;

        tracing::info!(
            "Packing item {} marked {}",
            item_id,
            if packed { "packed" } else { "unpacked" }
        );
        Ok(packed)
    }

    pub fn remove_item(&self, item_id: &str) -> Result<PackingItem> {
        let removed = self.records.remove(item_id)?;
        tracing::info!("Removed packing item {} ({})", removed.id, removed.name);
        Ok(removed)
    }
}
