use crate::catalog::Catalog;
use crate::commands::{Change, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{MAX_QUANTITY, MIN_QUANTITY};
use crate::store::BlobStore;
use tracing::debug;

/// Sets the basket quantity of a selected plant, clamped into `1..=999`.
pub fn run<S: BlobStore + ?Sized>(
    store: &mut S,
    catalog: &mut Catalog,
    id: &str,
    quantity: i64,
) -> Result<CmdResult> {
    if !catalog.is_selected(id) {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("Plant {} is not selected", id))));
    }

    let stored = catalog.transact(store, |draft| draft.set_quantity(id, quantity))?;
    let Some(stored) = stored else {
        return Ok(CmdResult::default());
    };
    debug!(id, requested = quantity, stored, "quantity set");

    let mut result = CmdResult::default().with_changes(&[Change::Selection]);
    if stored as i64 != quantity {
        result.add_message(CmdMessage::warning(format!(
            "Quantity must be between {} and {}; using {}",
            MIN_QUANTITY, MAX_QUANTITY, stored
        )));
    }
    result.add_message(CmdMessage::success(format!("Quantity set to {}", stored)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn clamps_into_range() {
        let mut store = StoreFixture::new()
            .with_plant("a", "Roos", 1.0)
            .with_selected("a", 1)
            .build();
        let mut catalog = Catalog::load(&mut store).unwrap();

        run(&mut store, &mut catalog, "a", 0).unwrap();
        assert_eq!(catalog.quantity("a"), Some(1));
        let result = run(&mut store, &mut catalog, "a", 5000).unwrap();
        assert_eq!(catalog.quantity("a"), Some(999));
        assert_eq!(result.messages[0].level, crate::commands::MessageLevel::Warning);

        run(&mut store, &mut catalog, "a", 12).unwrap();
        assert_eq!(Catalog::load(&mut store).unwrap().quantity("a"), Some(12));
    }

    #[test]
    fn unselected_plant_is_a_no_op() {
        let mut store = StoreFixture::new().with_plant("a", "Roos", 1.0).build();
        let mut catalog = Catalog::load(&mut store).unwrap();

        let result = run(&mut store, &mut catalog, "a", 3).unwrap();
        assert!(!result.changed());
        assert!(catalog.selection().is_empty());
        assert_eq!(store.writes(), 0);
    }
}
