//! Selection commands. Unknown plant ids are ignored; nothing here errors on a
//! lookup miss.

use crate::catalog::Catalog;
use crate::commands::{Change, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::BlobStore;
use tracing::debug;

/// Adds (at quantity 1) or removes one plant. Idempotent.
pub fn toggle<S: BlobStore + ?Sized>(
    store: &mut S,
    catalog: &mut Catalog,
    id: &str,
    selected: bool,
) -> Result<CmdResult> {
    let Some(name) = catalog.find(id).map(|p| p.name.clone()) else {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("No plant with id {}", id))));
    };
    if catalog.is_selected(id) == selected {
        return Ok(CmdResult::default());
    }

    catalog.transact(store, |draft| {
        if selected {
            draft.select(id);
        } else {
            draft.deselect(id);
        }
    })?;
    debug!(id, selected, "selection toggled");

    let message = if selected {
        format!("Selected: {}", name)
    } else {
        format!("Deselected: {}", name)
    };
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(message))
        .with_changes(&[Change::Selection]))
}

/// Replaces the selection with exactly `ids`, each at quantity 1.
pub fn select_all<S, I>(store: &mut S, catalog: &mut Catalog, ids: I) -> Result<CmdResult>
where
    S: BlobStore + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
    catalog.transact(store, |draft| {
        draft.replace_selection(ids.iter().map(String::as_str));
    })?;
    let count = catalog.selection().len();
    debug!(count, "selection replaced");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("{} plant(s) selected", count)))
        .with_changes(&[Change::Selection]))
}

pub fn clear<S: BlobStore + ?Sized>(store: &mut S, catalog: &mut Catalog) -> Result<CmdResult> {
    if catalog.selection().is_empty() {
        return Ok(
            CmdResult::default().with_message(CmdMessage::info("Selection is already empty"))
        );
    }
    catalog.transact(store, |draft| draft.clear_selection())?;
    debug!("selection cleared");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Selection cleared"))
        .with_changes(&[Change::Selection]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn setup() -> (InMemoryStore, Catalog) {
        let mut store = StoreFixture::new().with_plants(3).build();
        let catalog = Catalog::load(&mut store).unwrap();
        (store, catalog)
    }

    #[test]
    fn toggle_is_idempotent() {
        let (mut store, mut catalog) = setup();
        toggle(&mut store, &mut catalog, "p1", true).unwrap();
        catalog.transact(&mut store, |c| c.set_quantity("p1", 5)).unwrap();

        let again = toggle(&mut store, &mut catalog, "p1", true).unwrap();
        assert!(!again.changed());
        assert_eq!(catalog.quantity("p1"), Some(5));

        toggle(&mut store, &mut catalog, "p1", false).unwrap();
        let again = toggle(&mut store, &mut catalog, "p1", false).unwrap();
        assert!(!again.changed());
        assert!(catalog.selection().is_empty());
    }

    #[test]
    fn toggle_ignores_unknown_ids() {
        let (mut store, mut catalog) = setup();
        let result = toggle(&mut store, &mut catalog, "ghost", true).unwrap();
        assert!(!result.changed());
        assert!(catalog.selection().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn select_all_replaces_the_selection() {
        let (mut store, mut catalog) = setup();
        toggle(&mut store, &mut catalog, "p1", true).unwrap();
        catalog.transact(&mut store, |c| c.set_quantity("p1", 9)).unwrap();

        select_all(&mut store, &mut catalog, ["p3", "p2", "p3", "ghost"]).unwrap();
        let ids: Vec<_> = catalog.selection().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p2"]);
        assert!(catalog.selection().iter().all(|e| e.quantity == 1));
        assert_eq!(Catalog::load(&mut store).unwrap(), catalog);
    }

    #[test]
    fn clear_empties_the_selection() {
        let (mut store, mut catalog) = setup();
        select_all(&mut store, &mut catalog, ["p1", "p2"]).unwrap();
        let result = clear(&mut store, &mut catalog).unwrap();
        assert_eq!(result.changes, vec![Change::Selection]);
        assert!(catalog.selection().is_empty());

        let again = clear(&mut store, &mut catalog).unwrap();
        assert!(!again.changed());
    }
}
