//! # Planten Architecture
//!
//! Planten is a **UI-agnostic plant catalog library**: a catalog of plants, a
//! selection with per-plant quantities (the basket), a filter engine, persisted
//! export settings and a paginated PDF catalog exporter. The `planten` binary is
//! one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, change notifications          │
//! │  - Normalizes inputs (image bytes → data URIs, filters)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic over Catalog and ExportSettings           │
//! │  - Returns CmdResult with messages and changes              │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                           │
//!                  ▼                           ▼
//! ┌──────────────────────────────┐  ┌───────────────────────────┐
//! │  Storage Layer (store/)      │  │  Layout Layer (layout/)   │
//! │  - BlobStore trait           │  │  - DrawingSurface trait   │
//! │  - FileStore, InMemoryStore  │  │  - PdfSurface (lopdf)     │
//! └──────────────────────────────┘  └───────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns
//! `Result<CmdResult>`. It never prints and never exits. The only filesystem
//! access is the `FileStore`, the PDF file written by an export and local image
//! paths read by the image loader.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against `InMemoryStore` fixtures.
//! 2. **Layout**: the engine draws onto a recording surface, so tests assert
//!    positions, fonts and page numbers without parsing PDF.
//! 3. **API**: dispatch and change notification.
//! 4. **Binary** (`tests/`): end-to-end runs against a temp data dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`catalog`]: Plants plus selection, loaded with repair of stale entries
//! - [`filter`]: Free-text filtering of plants
//! - [`settings`]: Export settings with defaults and partial overrides
//! - [`layout`]: Page layout engine and the PDF surface
//! - [`imaging`]: Photo resizing and loading for export
//! - [`store`]: Blob storage abstraction and implementations
//! - [`model`]: Core data types (`Plant`, `SelectionEntry`, `Column`)
//! - [`init`]: Data directory resolution and context setup
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod error;
pub mod filter;
pub mod imaging;
pub mod init;
pub mod layout;
pub mod model;
pub mod settings;
pub mod store;
