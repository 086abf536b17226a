use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::filter;
use crate::model::Plant;

/// State of a "select all" toggle over the visible plants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// Every visible plant is selected.
    Checked,
    /// Something is selected, but not every visible plant.
    Indeterminate,
    Unchecked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListedPlant {
    pub plant: Plant,
    pub selected: bool,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub plants: Vec<ListedPlant>,
    pub select_all: SelectAllState,
    /// Size of the whole catalog, before filtering.
    pub catalog_size: usize,
}

pub fn run(catalog: &Catalog, filter_text: &str) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listing(listing(catalog, filter_text)))
}

pub fn listing(catalog: &Catalog, filter_text: &str) -> Listing {
    let plants: Vec<ListedPlant> = filter::filter_plants(catalog.plants(), filter_text)
        .into_iter()
        .map(|plant| ListedPlant {
            plant: plant.clone(),
            selected: catalog.is_selected(&plant.id),
            quantity: catalog.quantity(&plant.id),
        })
        .collect();

    let select_all = if !plants.is_empty() && plants.iter().all(|p| p.selected) {
        SelectAllState::Checked
    } else if !catalog.selection().is_empty() {
        SelectAllState::Indeterminate
    } else {
        SelectAllState::Unchecked
    };

    Listing {
        plants,
        select_all,
        catalog_size: catalog.plants().len(),
    }
}

/// Ids of the plants matching `filter_text`, in catalog order.
pub fn matching_ids(catalog: &Catalog, filter_text: &str) -> Vec<String> {
    filter::filter_plants(catalog.plants(), filter_text)
        .into_iter()
        .map(|p| p.id.clone())
        .collect()
}
