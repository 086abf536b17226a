//! # Catalog Store
//!
//! [`Catalog`] is the in-memory owner of the plant list and the selection. It is
//! loaded from a [`BlobStore`] once and then mutated only through
//! [`Catalog::transact`], which applies a change to a draft copy, persists the
//! draft, and only then swaps it in. A failed write therefore never leaves the
//! in-memory state ahead of what is on disk.
//!
//! ## Invariants
//!
//! - Plant ids are unique.
//! - Every selection entry references an existing plant, at most once, with a
//!   quantity in `1..=999`.
//!
//! ## Loading persisted data
//!
//! The selection blob has had two shapes over time: a list of bare id strings and
//! the current list of `{id, quantity}` entries. Legacy and damaged selections are
//! repaired on load and the repaired shape is written back straight away.

use crate::error::Result;
use crate::model::{clamp_quantity, ExportItem, Plant, SelectionEntry, MIN_QUANTITY};
use crate::store::{load_json, save_json, BlobStore, PLANTS_KEY, SELECTION_KEY};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    plants: Vec<Plant>,
    selection: Vec<SelectionEntry>,
}

impl Catalog {
    /// Loads the catalog and selection, repairing the selection if needed.
    pub fn load<S: BlobStore + ?Sized>(store: &mut S) -> Result<Self> {
        let plants: Vec<Plant> = load_json(store, PLANTS_KEY)?.unwrap_or_default();
        let (entries, mut dirty) = parse_selection(store.get_blob(SELECTION_KEY)?);

        let known: HashSet<&str> = plants.iter().map(|p| p.id.as_str()).collect();
        let mut seen = HashSet::new();
        let mut selection = Vec::with_capacity(entries.len());
        for entry in entries {
            if !known.contains(entry.id.as_str()) || !seen.insert(entry.id.clone()) {
                dirty = true;
                continue;
            }
            selection.push(entry);
        }

        let catalog = Self { plants, selection };
        if dirty {
            debug!(
                entries = catalog.selection.len(),
                "rewriting selection in canonical shape"
            );
            save_json(store, SELECTION_KEY, &catalog.selection)?;
        }
        Ok(catalog)
    }

    /// Writes both the plants and the selection.
    pub fn save<S: BlobStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save_json(store, PLANTS_KEY, &self.plants)?;
        save_json(store, SELECTION_KEY, &self.selection)?;
        Ok(())
    }

    /// Applies `change` to a copy of the catalog, persists the copy and commits it.
    ///
    /// If persisting fails part way, the previous state is written back so the
    /// store never holds half a transaction.
    pub(crate) fn transact<S, F, T>(&mut self, store: &mut S, change: F) -> Result<T>
    where
        S: BlobStore + ?Sized,
        F: FnOnce(&mut Catalog) -> T,
    {
        let mut draft = self.clone();
        let outcome = change(&mut draft);
        if let Err(err) = draft.save(store) {
            if let Err(restore) = self.save(store) {
                warn!(error = %restore, "could not restore catalog after a failed write");
            }
            return Err(err);
        }
        *self = draft;
        Ok(outcome)
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn selection(&self) -> &[SelectionEntry] {
        &self.selection
    }

    pub fn find(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|entry| entry.id == id)
    }

    pub fn quantity(&self, id: &str) -> Option<u32> {
        self.selection
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.quantity)
    }

    /// The selected plants in catalog order, one of each.
    pub fn selected_items(&self) -> Vec<ExportItem> {
        self.plants
            .iter()
            .filter(|p| self.is_selected(&p.id))
            .map(|p| ExportItem {
                plant: p.clone(),
                quantity: MIN_QUANTITY,
            })
            .collect()
    }

    /// The selected plants in selection order, with their quantities.
    pub fn basket_items(&self) -> Vec<ExportItem> {
        self.selection
            .iter()
            .filter_map(|entry| {
                self.find(&entry.id).map(|plant| ExportItem {
                    plant: plant.clone(),
                    quantity: entry.quantity,
                })
            })
            .collect()
    }

    /// A fresh id: the current time in milliseconds, bumped until unused.
    pub(crate) fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.contains(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    pub(crate) fn push_plant(&mut self, plant: Plant) {
        self.plants.push(plant);
    }

    pub(crate) fn plant_mut(&mut self, id: &str) -> Option<&mut Plant> {
        self.plants.iter_mut().find(|p| p.id == id)
    }

    /// Removes a plant together with its selection entry.
    pub(crate) fn remove_plant(&mut self, id: &str) -> Option<Plant> {
        let index = self.plants.iter().position(|p| p.id == id)?;
        self.selection.retain(|entry| entry.id != id);
        Some(self.plants.remove(index))
    }

    /// Adds a selection entry at quantity 1. Returns false if already selected
    /// or the plant does not exist.
    pub(crate) fn select(&mut self, id: &str) -> bool {
        if !self.contains(id) || self.is_selected(id) {
            return false;
        }
        self.selection.push(SelectionEntry::new(id));
        true
    }

    pub(crate) fn deselect(&mut self, id: &str) -> bool {
        let before = self.selection.len();
        self.selection.retain(|entry| entry.id != id);
        self.selection.len() != before
    }

    /// Replaces the selection with the given ids, each at quantity 1.
    pub(crate) fn replace_selection<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selection: Vec<SelectionEntry> = Vec::new();
        for id in ids {
            if self.contains(id) && !selection.iter().any(|e| e.id == id) {
                selection.push(SelectionEntry::new(id));
            }
        }
        self.selection = selection;
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Sets a clamped quantity. Returns the stored value, or `None` if the id
    /// is not selected.
    pub(crate) fn set_quantity(&mut self, id: &str, quantity: i64) -> Option<u32> {
        let entry = self.selection.iter_mut().find(|entry| entry.id == id)?;
        entry.quantity = clamp_quantity(quantity);
        Some(entry.quantity)
    }
}

/// Decodes the raw selection blob. The flag reports whether the stored shape
/// differs from the canonical one and should be rewritten.
fn parse_selection(raw: Option<String>) -> (Vec<SelectionEntry>, bool) {
    let Some(raw) = raw else {
        return (Vec::new(), false);
    };
    if raw.trim().is_empty() {
        return (Vec::new(), false);
    }

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                error = %err,
                "selection blob is not valid JSON; starting with an empty selection"
            );
            return (Vec::new(), false);
        }
    };

    let Value::Array(items) = value else {
        warn!("selection blob is not a list; starting with an empty selection");
        return (Vec::new(), false);
    };

    let mut dirty = false;
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match item {
            // Legacy shape: a bare id.
            Value::String(id) => {
                dirty = true;
                entries.push(SelectionEntry::new(id));
            }
            Value::Object(map) => {
                let id = match map.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Number(n)) => {
                        dirty = true;
                        n.to_string()
                    }
                    _ => {
                        dirty = true;
                        continue;
                    }
                };
                let requested = match map.get("quantity") {
                    Some(Value::Number(n)) => n
                        .as_i64()
                        .or_else(|| n.as_f64().map(|f| f as i64))
                        .unwrap_or(MIN_QUANTITY as i64),
                    Some(Value::String(s)) => s.trim().parse().unwrap_or(MIN_QUANTITY as i64),
                    _ => MIN_QUANTITY as i64,
                };
                let quantity = clamp_quantity(requested);
                let stored = map.get("quantity").and_then(Value::as_i64);
                if stored != Some(quantity as i64) {
                    dirty = true;
                }
                entries.push(SelectionEntry { id, quantity });
            }
            _ => dirty = true,
        }
    }

    if dirty {
        debug!(entries = entries.len(), "migrated selection from a legacy shape");
    }
    (entries, dirty)
}
