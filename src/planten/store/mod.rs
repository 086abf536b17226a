//! # Storage Layer
//!
//! Everything planten persists is a named JSON blob. The [`BlobStore`] trait is the
//! only thing the rest of the library knows about storage, so the catalog and the
//! settings never care whether blobs live in files, in memory, or somewhere else.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage, one `<key>.json` file per blob in a
//!   data directory. Writes go through a temp file and a rename.
//! - [`memory::InMemoryStore`]: In-memory storage for testing.
//!
//! ## Blobs
//!
//! ```text
//! <data dir>/
//! ├── planten.json        # Plant records (JSON array)
//! ├── geselecteerd.json   # Selection entries: [{"id": ..., "quantity": ...}]
//! └── pdfSettings.json    # Export settings override
//! ```
//!
//! Typed encoding and decoding happens at this boundary through [`load_json`] and
//! [`save_json`]; callers that need to repair malformed data read the raw blob
//! instead.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod fs;
pub mod memory;

/// Key of the plant catalog blob.
pub const PLANTS_KEY: &str = "planten";
/// Key of the selection blob.
pub const SELECTION_KEY: &str = "geselecteerd";
/// Key of the export settings blob.
pub const SETTINGS_KEY: &str = "pdfSettings";

/// A get/set-by-key store of string blobs.
pub trait BlobStore {
    /// Returns the blob stored under `key`, or `None` if it was never written.
    fn get_blob(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn set_blob(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Reads and decodes a blob. Missing blobs decode to `None`.
pub fn load_json<S: BlobStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>> {
    match store.get_blob(key)? {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

/// Encodes and writes a blob.
pub fn save_json<S: BlobStore + ?Sized, T: Serialize + ?Sized>(
    store: &mut S,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set_blob(key, &raw)
}
