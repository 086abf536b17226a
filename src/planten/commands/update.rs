use crate::catalog::Catalog;
use crate::commands::{validate_price, Change, CmdMessage, CmdResult};
use crate::error::{PlantenError, Result};
use crate::model::PlantUpdate;
use crate::store::BlobStore;
use tracing::debug;

/// Overwrites the fields `update` carries. A `None` image keeps the current one.
/// Unknown ids are reported, not treated as errors.
pub fn run<S: BlobStore + ?Sized>(
    store: &mut S,
    catalog: &mut Catalog,
    id: &str,
    update: PlantUpdate,
    image: Option<String>,
) -> Result<CmdResult> {
    if !catalog.contains(id) {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("No plant with id {}", id))));
    }
    if update.is_empty() && image.is_none() {
        return Ok(CmdResult::default().with_message(CmdMessage::info("Nothing to update")));
    }

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(PlantenError::validation("Name is required"));
        }
    }
    if let Some(kind) = &update.kind {
        if kind.trim().is_empty() {
            return Err(PlantenError::validation("Kind is required"));
        }
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    let update = PlantUpdate {
        name: update.name.map(|n| n.trim().to_string()),
        kind: update.kind.map(|k| k.trim().to_string()),
        ..update
    };

    let plant = catalog.transact(store, |draft| {
        draft.plant_mut(id).map(|plant| {
            plant.apply(&update, image);
            plant.clone()
        })
    })?;

    let Some(plant) = plant else {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("No plant with id {}", id))));
    };
    debug!(id = %plant.id, "plant updated");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Plant updated: {}", plant.name)))
        .with_changes(&[Change::Plants])
        .with_affected_plants(vec![plant]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn setup() -> (InMemoryStore, Catalog) {
        let mut store = StoreFixture::new().with_plant("a", "Roos", 10.0).build();
        let catalog = Catalog::load(&mut store).unwrap();
        (store, catalog)
    }

    #[test]
    fn overwrites_provided_fields_only() {
        let (mut store, mut catalog) = setup();
        let update = PlantUpdate {
            price: Some(12.5),
            description: Some("Geurig".into()),
            ..Default::default()
        };
        run(&mut store, &mut catalog, "a", update, None).unwrap();

        let plant = catalog.find("a").unwrap();
        assert_eq!(plant.name, "Roos");
        assert_eq!(plant.price, 12.5);
        assert_eq!(plant.description.as_deref(), Some("Geurig"));
        assert_eq!(Catalog::load(&mut store).unwrap(), catalog);
    }

    #[test]
    fn missing_image_keeps_the_old_one() {
        let (mut store, mut catalog) = setup();
        let image = Some("data:image/jpeg;base64,AA==".into());
        run(&mut store, &mut catalog, "a", PlantUpdate::default(), image).unwrap();
        let rename = PlantUpdate {
            name: Some("Klimroos".into()),
            ..Default::default()
        };
        run(&mut store, &mut catalog, "a", rename, None).unwrap();

        let plant = catalog.find("a").unwrap();
        assert_eq!(plant.name, "Klimroos");
        assert_eq!(plant.image.as_deref(), Some("data:image/jpeg;base64,AA=="));
    }

    #[test]
    fn unknown_id_is_a_notice() {
        let (mut store, mut catalog) = setup();
        let update = PlantUpdate {
            name: Some("X".into()),
            ..Default::default()
        };
        let result = run(&mut store, &mut catalog, "nope", update, None).unwrap();
        assert!(!result.changed());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn rejects_negative_price() {
        let (mut store, mut catalog) = setup();
        let update = PlantUpdate {
            price: Some(-2.0),
            ..Default::default()
        };
        assert!(run(&mut store, &mut catalog, "a", update, None).is_err());
        assert_eq!(catalog.find("a").unwrap().price, 10.0);
    }
}
