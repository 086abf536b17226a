//! # Export Settings
//!
//! Presentation options for PDF export, persisted in the `pdfSettings` blob.
//!
//! Loading is a shallow merge: start from [`ExportSettings::defaults`] and overlay
//! every persisted key that still has the expected shape. Blobs written by older
//! versions simply lack the newer keys and pick up their defaults; `null`s and
//! values of the wrong type are skipped with a warning. Merging twice gives the
//! same result as merging once.
//!
//! The export date defaults to today's date at every load unless the stored blob
//! carries one.

use crate::error::Result;
use crate::model::Column;
use crate::store::{save_json, BlobStore, SETTINGS_KEY};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_TITLE: &str = "Mijn Plantenlijst";
pub const DEFAULT_TITLE_COLOR: &str = "#388e3c";
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Smallest font size the layout can derive its smaller sizes from.
pub const MIN_FONT_SIZE: f64 = 4.0;
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";
pub const DEFAULT_BORDER_COLOR: &str = "#888";
pub const DEFAULT_COMPANY_INFO: &str =
    "Jouw Bedrijfsnaam, Adres, Postcode Plaats, Telefoon, E-mail";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keys accepted by [`ExportSettings::get`] and [`ExportSettings::set`].
pub const SETTING_KEYS: &[&str] = &[
    "title",
    "title-color",
    "font-size",
    "header",
    "logo-url",
    "columns",
    "show-column-headers",
    "font-family",
    "row-colors",
    "border-color",
    "export-date",
    "company-info",
    "col-name.<column>",
    "col-width.<column>",
    "align.<column>",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub title: String,
    pub title_color: String,
    pub font_size: f64,
    pub header: String,
    pub logo_url: String,
    #[serde(deserialize_with = "known_columns")]
    pub columns: Vec<Column>,
    pub show_column_headers: bool,
    pub col_widths: BTreeMap<String, f64>,
    pub col_names: BTreeMap<String, String>,
    pub align: BTreeMap<String, String>,
    pub font_family: String,
    pub row_colors: Vec<String>,
    pub border_color: String,
    pub export_date: String,
    pub company_info: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::defaults(&today())
    }
}

impl ExportSettings {
    /// The built-in defaults with the given export date.
    pub fn defaults(export_date: &str) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            title_color: DEFAULT_TITLE_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            header: String::new(),
            logo_url: String::new(),
            columns: Column::ALL.to_vec(),
            show_column_headers: true,
            col_widths: BTreeMap::new(),
            col_names: BTreeMap::new(),
            align: BTreeMap::new(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            row_colors: vec!["#fff".to_string(), "#f8f8f8".to_string()],
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            export_date: export_date.to_string(),
            company_info: DEFAULT_COMPANY_INFO.to_string(),
        }
    }

    /// Loads the persisted override merged over today's defaults.
    pub fn load<S: BlobStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self::merge(Self::default(), store.get_blob(SETTINGS_KEY)?.as_deref()))
    }

    /// Overlays a raw persisted blob over `base`, key by key.
    pub fn merge(base: Self, raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return base;
        };

        let overrides = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => return base,
            Ok(_) => {
                warn!("export settings blob is not an object; using defaults");
                return base;
            }
            Err(err) => {
                warn!(error = %err, "export settings blob is not valid JSON; using defaults");
                return base;
            }
        };

        let mut merged = match serde_json::to_value(&base) {
            Ok(Value::Object(map)) => map,
            _ => return base,
        };

        for (key, value) in overrides {
            if value.is_null() {
                continue;
            }
            if !merged.contains_key(&key) {
                continue;
            }
            let mut candidate: Map<String, Value> = merged.clone();
            candidate.insert(key.clone(), value);
            match serde_json::from_value::<Self>(Value::Object(candidate.clone())) {
                Ok(settings) if settings.font_size_in_range() => merged = candidate,
                Ok(_) => warn!(key = %key, "ignoring export setting with an out-of-range value"),
                Err(_) => warn!(key = %key, "ignoring export setting with an unexpected shape"),
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or(base)
    }

    fn font_size_in_range(&self) -> bool {
        self.font_size.is_finite() && self.font_size >= MIN_FONT_SIZE
    }

    pub fn save<S: BlobStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save_json(store, SETTINGS_KEY, self)
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Label for a column, honouring a `colNames` override.
    pub fn column_label(&self, column: Column) -> String {
        self.col_names
            .get(column.key())
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| column.default_label().to_string())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some((prefix, column)) = split_column_key(key) {
            let column = column.parse::<Column>().ok()?;
            return match prefix {
                "col-name" => Some(self.column_label(column)),
                "col-width" => self.col_widths.get(column.key()).map(|w| w.to_string()),
                "align" => self.align.get(column.key()).cloned(),
                _ => None,
            };
        }

        let value = match key {
            "title" => self.title.clone(),
            "title-color" => self.title_color.clone(),
            "font-size" => self.font_size.to_string(),
            "header" => self.header.clone(),
            "logo-url" => self.logo_url.clone(),
            "columns" => self
                .columns
                .iter()
                .map(|c| c.key())
                .collect::<Vec<_>>()
                .join(","),
            "show-column-headers" => self.show_column_headers.to_string(),
            "font-family" => self.font_family.clone(),
            "row-colors" => self.row_colors.join(","),
            "border-color" => self.border_color.clone(),
            "export-date" => self.export_date.clone(),
            "company-info" => self.company_info.clone(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        if let Some((prefix, column)) = split_column_key(key) {
            let column = column.parse::<Column>()?;
            let column_key = column.key().to_string();
            match prefix {
                "col-name" => {
                    if value.trim().is_empty() {
                        self.col_names.remove(&column_key);
                    } else {
                        self.col_names.insert(column_key, value.to_string());
                    }
                }
                "col-width" => {
                    let width = parse_positive(value, key)?;
                    self.col_widths.insert(column_key, width);
                }
                "align" => {
                    let align = value.trim().to_lowercase();
                    if !matches!(align.as_str(), "left" | "center" | "right") {
                        return Err(format!("Invalid alignment: {} (left, center, right)", value));
                    }
                    self.align.insert(column_key, align);
                }
                _ => return Err(format!("Unknown setting: {}", key)),
            }
            return Ok(());
        }

        match key {
            "title" => self.title = value.to_string(),
            "title-color" => self.title_color = parse_color(value)?,
            "font-size" => self.font_size = parse_font_size(value)?,
            "header" => self.header = value.to_string(),
            "logo-url" => self.logo_url = value.trim().to_string(),
            "columns" => {
                let mut columns = Vec::new();
                for name in value.split(',').filter(|n| !n.trim().is_empty()) {
                    let column = name.parse::<Column>()?;
                    if !columns.contains(&column) {
                        columns.push(column);
                    }
                }
                self.columns = columns;
            }
            "show-column-headers" => {
                self.show_column_headers = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "1" | "on" => true,
                    "false" | "no" | "0" | "off" => false,
                    _ => return Err(format!("Invalid boolean: {}", value)),
                }
            }
            "font-family" => self.font_family = value.trim().to_string(),
            "row-colors" => {
                self.row_colors = value
                    .split(',')
                    .filter(|c| !c.trim().is_empty())
                    .map(parse_color)
                    .collect::<std::result::Result<_, _>>()?
            }
            "border-color" => self.border_color = parse_color(value)?,
            "export-date" => {
                let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
                    .map_err(|_| format!("Invalid date: {} (expected YYYY-MM-DD)", value))?;
                self.export_date = date.format(DATE_FORMAT).to_string();
            }
            "company-info" => self.company_info = value.to_string(),
            _ => return Err(format!("Unknown setting: {}", key)),
        }
        Ok(())
    }
}

/// Today's date in UTC, formatted as `YYYY-MM-DD`.
pub fn today() -> String {
    Utc::now().date_naive().format(DATE_FORMAT).to_string()
}

fn split_column_key(key: &str) -> Option<(&str, &str)> {
    let (prefix, column) = key.split_once('.')?;
    matches!(prefix, "col-name" | "col-width" | "align").then_some((prefix, column))
}

fn parse_positive(value: &str, key: &str) -> std::result::Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(format!("{} must be a positive number", key)),
    }
}

fn parse_font_size(value: &str) -> std::result::Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= MIN_FONT_SIZE => Ok(n),
        _ => Err(format!("font-size must be a number of at least {}", MIN_FONT_SIZE)),
    }
}

fn parse_color(value: &str) -> std::result::Result<String, String> {
    let value = value.trim();
    let hex = value.strip_prefix('#').unwrap_or(value);
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_lowercase()))
    } else {
        Err(format!("Invalid color: {} (expected #rgb or #rrggbb)", value))
    }
}

// Drops column names this version does not know instead of rejecting the blob.
fn known_columns<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Column>, D::Error> {
    let names: Vec<String> = Vec::deserialize(deserializer)?;
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        match name.parse::<Column>() {
            Ok(column) if !columns.contains(&column) => columns.push(column),
            Ok(_) => {}
            Err(_) => warn!(column = %name, "dropping unknown export column"),
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn missing_blob_gives_defaults_with_today() {
        let store = InMemoryStore::new();
        let settings = ExportSettings::load(&store).unwrap();
        assert_eq!(settings, ExportSettings::defaults(&today()));
        assert_eq!(settings.columns.len(), 6);
    }

    #[test]
    fn partial_blob_overrides_only_its_keys() {
        let mut store = InMemoryStore::new();
        store.set_blob(SETTINGS_KEY, r#"{"title":"Custom"}"#).unwrap();
        let settings = ExportSettings::load(&store).unwrap();

        let mut expected = ExportSettings::defaults(&today());
        expected.title = "Custom".into();
        assert_eq!(settings, expected);
    }

    #[test]
    fn merge_is_idempotent() {
        let raw = r#"{"title":"Custom","fontSize":14,"columns":["naam","prijs"]}"#;
        let once = ExportSettings::merge(ExportSettings::defaults("2024-01-01"), Some(raw));
        let twice = ExportSettings::merge(once.clone(), Some(raw));
        assert_eq!(once, twice);
        assert_eq!(once.columns, vec![Column::Name, Column::Price]);
    }

    #[test]
    fn persisted_export_date_wins() {
        let raw = r#"{"exportDate":"2023-05-01"}"#;
        let settings = ExportSettings::merge(ExportSettings::defaults("2024-01-01"), Some(raw));
        assert_eq!(settings.export_date, "2023-05-01");
    }

    #[test]
    fn nulls_and_wrong_shapes_fall_back_to_defaults() {
        let raw = r#"{"logoUrl":null,"fontSize":"huge","title":"Kept"}"#;
        let settings = ExportSettings::merge(ExportSettings::defaults("2024-01-01"), Some(raw));
        assert_eq!(settings.logo_url, "");
        assert_eq!(settings.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(settings.title, "Kept");
    }

    #[test]
    fn unknown_columns_are_dropped() {
        let raw = r#"{"columns":["naam","voorraad","prijs"]}"#;
        let settings = ExportSettings::merge(ExportSettings::defaults("2024-01-01"), Some(raw));
        assert_eq!(settings.columns, vec![Column::Name, Column::Price]);
    }

    #[test]
    fn non_object_blob_gives_defaults() {
        let base = ExportSettings::defaults("2024-01-01");
        assert_eq!(ExportSettings::merge(base.clone(), Some("[1,2]")), base);
        assert_eq!(ExportSettings::merge(base.clone(), Some("null")), base);
        assert_eq!(ExportSettings::merge(base.clone(), Some("{oops")), base);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = InMemoryStore::new();
        let mut settings = ExportSettings::defaults("2024-02-02");
        settings.set("title", "Voorjaar").unwrap();
        settings.set("columns", "naam,prijs").unwrap();
        settings.save(&mut store).unwrap();

        let loaded = ExportSettings::load(&store).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn unusable_font_sizes_are_skipped_on_merge() {
        let blobs = [
            r#"{"fontSize":-4,"title":"Kept"}"#,
            r#"{"fontSize":0.5,"title":"Kept"}"#,
        ];
        for raw in blobs {
            let settings = ExportSettings::merge(ExportSettings::defaults("2024-01-01"), Some(raw));
            assert_eq!(settings.font_size, DEFAULT_FONT_SIZE);
            assert_eq!(settings.title, "Kept");
        }

        let raw = r#"{"fontSize":4}"#;
        let settings = ExportSettings::merge(ExportSettings::defaults("2024-01-01"), Some(raw));
        assert_eq!(settings.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn font_size_has_a_floor() {
        let mut settings = ExportSettings::defaults("2024-01-01");
        assert!(settings.set("font-size", "0.5").is_err());
        assert!(settings.set("font-size", "-4").is_err());
        assert_eq!(settings.font_size, DEFAULT_FONT_SIZE);

        settings.set("font-size", "4").unwrap();
        assert_eq!(settings.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn set_validates_values() {
        let mut settings = ExportSettings::defaults("2024-01-01");
        assert!(settings.set("font-size", "0").is_err());
        assert!(settings.set("title-color", "green").is_err());
        assert!(settings.set("export-date", "01-02-2024").is_err());
        assert!(settings.set("columns", "naam,stock").is_err());
        assert!(settings.set("nope", "x").is_err());

        settings.set("title-color", "ABC").unwrap();
        assert_eq!(settings.title_color, "#abc");
        settings.set("columns", "price, name, price").unwrap();
        assert_eq!(settings.columns, vec![Column::Price, Column::Name]);
    }

    #[test]
    fn column_overrides() {
        let mut settings = ExportSettings::defaults("2024-01-01");
        assert_eq!(settings.column_label(Column::Kind), "Soort");
        settings.set("col-name.kind", "Type").unwrap();
        assert_eq!(settings.column_label(Column::Kind), "Type");
        assert_eq!(settings.get("col-name.soort").as_deref(), Some("Type"));

        settings.set("align.prijs", "Right").unwrap();
        assert_eq!(settings.align.get("prijs").map(String::as_str), Some("right"));
        assert!(settings.set("align.prijs", "justify").is_err());
    }
}
