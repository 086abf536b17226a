use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::{PlantenError, Result};

pub fn run(catalog: &Catalog, id: &str) -> Result<CmdResult> {
    let plant = catalog
        .find(id)
        .cloned()
        .ok_or_else(|| PlantenError::PlantNotFound(id.to_string()))?;
    Ok(CmdResult::default().with_affected_plants(vec![plant]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn shows_one_plant() {
        let mut store = StoreFixture::new().with_plants(2).build();
        let catalog = Catalog::load(&mut store).unwrap();

        let result = run(&catalog, "p2").unwrap();
        assert_eq!(result.affected_plants[0].name, "Plant 2");
        assert!(matches!(run(&catalog, "p9"), Err(PlantenError::PlantNotFound(_))));
    }
}
