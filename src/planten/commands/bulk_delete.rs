use crate::catalog::Catalog;
use crate::commands::{Change, CmdMessage, CmdResult, Confirm};
use crate::error::Result;
use crate::store::BlobStore;
use tracing::debug;

/// Deletes every selected plant and clears the selection.
pub fn run<S, C>(store: &mut S, catalog: &mut Catalog, confirm: &mut C) -> Result<CmdResult>
where
    S: BlobStore + ?Sized,
    C: Confirm + ?Sized,
{
    let ids: Vec<String> = catalog.selection().iter().map(|e| e.id.clone()).collect();
    if ids.is_empty() {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::warning("No plants selected to delete.")));
    }

    let prompt = format!("Delete {} selected plant(s)?", ids.len());
    if !confirm.confirm(&prompt) {
        return Ok(CmdResult::default().with_message(CmdMessage::info("Operation cancelled.")));
    }

    let removed = catalog.transact(store, |draft| {
        let removed: Vec<_> = ids.iter().filter_map(|id| draft.remove_plant(id)).collect();
        draft.clear_selection();
        removed
    })?;
    debug!(count = removed.len(), "selected plants deleted");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("{} plant(s) deleted", removed.len())))
        .with_changes(&[Change::Plants, Change::Selection])
        .with_affected_plants(removed))
}
