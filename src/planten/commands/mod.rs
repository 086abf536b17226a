use crate::error::{PlantenError, Result};
use crate::model::{Plant, PlantFields};
use crate::settings::ExportSettings;
use std::path::PathBuf;

pub mod add;
pub mod basket;
pub mod bulk_delete;
pub mod delete;
pub mod export;
pub mod list;
pub mod quantity;
pub mod selection;
pub mod settings;
pub mod show;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Which part of the persisted state a command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Plants,
    Selection,
    Settings,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_plants: Vec<Plant>,
    pub listing: Option<list::Listing>,
    pub basket: Option<basket::BasketView>,
    pub settings: Option<ExportSettings>,
    pub export_path: Option<PathBuf>,
    pub changes: Vec<Change>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_plants(mut self, plants: Vec<Plant>) -> Self {
        self.affected_plants = plants;
        self
    }

    pub fn with_listing(mut self, listing: list::Listing) -> Self {
        self.listing = Some(listing);
        self
    }

    pub fn with_basket(mut self, basket: basket::BasketView) -> Self {
        self.basket = Some(basket);
        self
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_export_path(mut self, path: PathBuf) -> Self {
        self.export_path = Some(path);
        self
    }

    pub fn with_changes(mut self, changes: &[Change]) -> Self {
        for change in changes {
            if !self.changes.contains(change) {
                self.changes.push(*change);
            }
        }
        self
    }

    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Asks the user before a destructive command goes ahead.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Rejects plant input that must never reach the catalog.
pub(crate) fn validate_fields(name: &str, kind: &str, price: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PlantenError::validation("Name is required"));
    }
    if kind.trim().is_empty() {
        return Err(PlantenError::validation("Kind is required"));
    }
    validate_price(price)
}

pub(crate) fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(PlantenError::validation(format!(
            "Price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}

/// Trims the required text fields of new plant input.
pub(crate) fn normalize_fields(mut fields: PlantFields) -> PlantFields {
    fields.name = fields.name.trim().to_string();
    fields.kind = fields.kind.trim().to_string();
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert!(!Confirm::confirm(&mut confirm, "Delete?"));
        assert_eq!(asked, vec!["Delete?"]);
    }

    #[test]
    fn changes_are_deduplicated() {
        let result = CmdResult::default()
            .with_changes(&[Change::Plants, Change::Selection])
            .with_changes(&[Change::Selection]);
        assert_eq!(result.changes, vec![Change::Plants, Change::Selection]);
        assert!(result.changed());
    }

    #[test]
    fn field_validation() {
        assert!(validate_fields("Roos", "Struik", 0.0).is_ok());
        assert!(validate_fields("  ", "Struik", 1.0).is_err());
        assert!(validate_fields("Roos", "", 1.0).is_err());
        assert!(validate_fields("Roos", "Struik", -1.0).is_err());
        assert!(validate_fields("Roos", "Struik", f64::NAN).is_err());
    }
}
