use crate::catalog::Catalog;
use crate::commands::{Change, CmdMessage, CmdResult, Confirm};
use crate::error::Result;
use crate::store::BlobStore;
use tracing::debug;

/// Deletes a plant and its selection entry after confirmation.
pub fn run<S, C>(
    store: &mut S,
    catalog: &mut Catalog,
    id: &str,
    confirm: &mut C,
) -> Result<CmdResult>
where
    S: BlobStore + ?Sized,
    C: Confirm + ?Sized,
{
    let Some(plant) = catalog.find(id) else {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("No plant with id {}", id))));
    };

    let prompt = format!("Delete {}?", plant.name);
    if !confirm.confirm(&prompt) {
        return Ok(CmdResult::default().with_message(CmdMessage::info("Operation cancelled.")));
    }

    let removed = catalog.transact(store, |draft| draft.remove_plant(id))?;
    let Some(removed) = removed else {
        return Ok(CmdResult::default());
    };
    debug!(id = %removed.id, "plant deleted");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Plant deleted: {}", removed.name)))
        .with_changes(&[Change::Plants, Change::Selection])
        .with_affected_plants(vec![removed]))
}
