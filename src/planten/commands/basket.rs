use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Plant;

#[derive(Debug, Clone, PartialEq)]
pub struct BasketLine {
    pub plant: Plant,
    pub quantity: u32,
    pub line_total: f64,
}

/// The selection with quantities, in selection order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasketView {
    pub lines: Vec<BasketLine>,
    pub total: f64,
}

impl BasketView {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let lines: Vec<BasketLine> = catalog
            .basket_items()
            .into_iter()
            .map(|item| BasketLine {
                line_total: item.line_total(),
                quantity: item.quantity,
                plant: item.plant,
            })
            .collect();
        let total = lines.iter().map(|l| l.line_total).sum();
        Self { lines, total }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn run(catalog: &Catalog) -> Result<CmdResult> {
    let view = BasketView::from_catalog(catalog);
    let mut result = CmdResult::default();
    if view.is_empty() {
        result.add_message(CmdMessage::info("Basket is empty."));
    }
    Ok(result.with_basket(view))
}
