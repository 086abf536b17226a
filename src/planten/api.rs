//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! planten operation, whatever UI drives it.
//!
//! `PlantenApi` owns the blob store together with the loaded [`Catalog`] and
//! [`ExportSettings`]. Each method dispatches to a command, and when the command
//! reports changes, every subscriber registered with [`PlantenApi::subscribe`]
//! is told which parts of the state moved. A UI re-renders from that signal.
//!
//! The facade also normalizes inputs: raw image bytes are scaled down to a JPEG
//! data URI before a plant is stored, and filter strings are resolved to ids for
//! "select all".
//!
//! No stdout, no stderr, no terminal assumptions.

use crate::catalog::Catalog;
use crate::commands::{self, settings::SettingsAction, Change, CmdResult, Confirm};
use crate::error::Result;
use crate::imaging::{self, DataUriLoader, ImageLoader, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH};
use crate::model::{ExportMode, PlantFields, PlantUpdate};
use crate::settings::ExportSettings;
use crate::store::BlobStore;
use std::path::Path;

type Listener = Box<dyn FnMut(&[Change])>;

pub struct PlantenApi<S: BlobStore> {
    store: S,
    catalog: Catalog,
    settings: ExportSettings,
    listeners: Vec<Listener>,
}

impl<S: BlobStore> PlantenApi<S> {
    /// Loads catalog, selection and settings from `store`.
    pub fn open(mut store: S) -> Result<Self> {
        let catalog = Catalog::load(&mut store)?;
        let settings = ExportSettings::load(&store)?;
        Ok(Self {
            store,
            catalog,
            settings,
            listeners: Vec::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a callback run after every command that changed state.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&[Change]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, result: Result<CmdResult>) -> Result<CmdResult> {
        if let Ok(cmd) = &result {
            if cmd.changed() {
                for listener in &mut self.listeners {
                    listener(&cmd.changes);
                }
            }
        }
        result
    }

    pub fn add_plant(&mut self, fields: PlantFields, image: Option<&[u8]>) -> Result<CmdResult> {
        let image = resize(image)?;
        let result = commands::add::run(&mut self.store, &mut self.catalog, fields, image);
        self.notify(result)
    }

    pub fn update_plant(
        &mut self,
        id: &str,
        update: PlantUpdate,
        image: Option<&[u8]>,
    ) -> Result<CmdResult> {
        let image = resize(image)?;
        let result = commands::update::run(&mut self.store, &mut self.catalog, id, update, image);
        self.notify(result)
    }

    pub fn delete_plant<C: Confirm + ?Sized>(
        &mut self,
        id: &str,
        confirm: &mut C,
    ) -> Result<CmdResult> {
        let result = commands::delete::run(&mut self.store, &mut self.catalog, id, confirm);
        self.notify(result)
    }

    pub fn toggle_selection(&mut self, id: &str, selected: bool) -> Result<CmdResult> {
        let result = commands::selection::toggle(&mut self.store, &mut self.catalog, id, selected);
        self.notify(result)
    }

    pub fn select_all<I>(&mut self, ids: I) -> Result<CmdResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let result = commands::selection::select_all(&mut self.store, &mut self.catalog, ids);
        self.notify(result)
    }

    /// Selects exactly the plants the filter shows.
    pub fn select_matching(&mut self, filter: &str) -> Result<CmdResult> {
        let ids = commands::list::matching_ids(&self.catalog, filter);
        self.select_all(ids)
    }

    pub fn clear_selection(&mut self) -> Result<CmdResult> {
        let result = commands::selection::clear(&mut self.store, &mut self.catalog);
        self.notify(result)
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Result<CmdResult> {
        let result = commands::quantity::run(&mut self.store, &mut self.catalog, id, quantity);
        self.notify(result)
    }

    pub fn bulk_delete_selected<C: Confirm + ?Sized>(
        &mut self,
        confirm: &mut C,
    ) -> Result<CmdResult> {
        let result = commands::bulk_delete::run(&mut self.store, &mut self.catalog, confirm);
        self.notify(result)
    }

    pub fn list_plants(&self, filter: &str) -> Result<CmdResult> {
        commands::list::run(&self.catalog, filter)
    }

    pub fn basket(&self) -> Result<CmdResult> {
        commands::basket::run(&self.catalog)
    }

    pub fn show_plant(&self, id: &str) -> Result<CmdResult> {
        commands::show::run(&self.catalog, id)
    }

    /// Exports with the default loader (data URIs and local files).
    pub fn export_pdf(&self, mode: ExportMode, out_dir: &Path) -> Result<CmdResult> {
        self.export_pdf_with(mode, out_dir, &DataUriLoader)
    }

    pub fn export_pdf_with<L: ImageLoader + ?Sized>(
        &self,
        mode: ExportMode,
        out_dir: &Path,
        loader: &L,
    ) -> Result<CmdResult> {
        commands::export::run(&self.catalog, &self.settings, mode, out_dir, loader)
    }

    pub fn settings_action(&mut self, action: SettingsAction) -> Result<CmdResult> {
        let result = commands::settings::run(&mut self.store, &mut self.settings, action);
        self.notify(result)
    }
}

fn resize(image: Option<&[u8]>) -> Result<Option<String>> {
    image
        .map(|bytes| imaging::resize_to_data_uri(bytes, MAX_IMAGE_WIDTH, MAX_IMAGE_HEIGHT))
        .transpose()
}
