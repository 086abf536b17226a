use super::BlobStore;
use crate::error::Result;
use std::collections::HashMap;

/// In-memory blob store for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    blobs: HashMap<String, String>,
    writes: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_blob` calls since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BlobStore for InMemoryStore {
    fn get_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set_blob(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Plant, PlantFields, SelectionEntry};
    use crate::store::{save_json, PLANTS_KEY, SELECTION_KEY};

    /// Builds a store pre-populated with plants and a selection.
    pub struct StoreFixture {
        pub plants: Vec<Plant>,
        pub selection: Vec<SelectionEntry>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                plants: Vec::new(),
                selection: Vec::new(),
            }
        }

        pub fn with_plant(mut self, id: &str, name: &str, price: f64) -> Self {
            let fields = PlantFields::new(name, "Vaste plant", price);
            self.plants.push(Plant::new(id.to_string(), fields, None));
            self
        }

        pub fn with_plants(mut self, count: usize) -> Self {
            for i in 0..count {
                let fields = PlantFields::new(format!("Plant {}", i + 1), "Vaste plant", 2.5)
                    .with_description(format!("Description for plant {}", i + 1));
                self.plants
                    .push(Plant::new(format!("p{}", i + 1), fields, None));
            }
            self
        }

        pub fn with_selected(mut self, id: &str, quantity: u32) -> Self {
            self.selection.push(SelectionEntry {
                id: id.to_string(),
                quantity,
            });
            self
        }

        pub fn build(self) -> InMemoryStore {
            let mut store = InMemoryStore::new();
            save_json(&mut store, PLANTS_KEY, &self.plants).unwrap();
            save_json(&mut store, SELECTION_KEY, &self.selection).unwrap();
            store.writes = 0;
            store
        }
    }
}
