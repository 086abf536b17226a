use crate::catalog::Catalog;
use crate::commands::{normalize_fields, validate_fields, Change, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Plant, PlantFields};
use crate::store::BlobStore;
use tracing::debug;

/// Adds a plant. `image` is an already resized data URI.
pub fn run<S: BlobStore + ?Sized>(
    store: &mut S,
    catalog: &mut Catalog,
    fields: PlantFields,
    image: Option<String>,
) -> Result<CmdResult> {
    let fields = normalize_fields(fields);
    validate_fields(&fields.name, &fields.kind, fields.price)?;

    let plant = catalog.transact(store, |draft| {
        let plant = Plant::new(draft.next_id(), fields, image);
        draft.push_plant(plant.clone());
        plant
    })?;
    debug!(id = %plant.id, "plant added");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Plant added: {}", plant.name)))
        .with_changes(&[Change::Plants])
        .with_affected_plants(vec![plant]))
}
