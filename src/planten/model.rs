use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 999;

/// Clamps a requested quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
pub fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(MIN_QUANTITY as i64, MAX_QUANTITY as i64) as u32
}

/// Formats an amount as euros with two decimals, e.g. `€12.50`.
pub fn format_euro(amount: f64) -> String {
    format!("€{:.2}", amount)
}

/// A catalog entry. Field names on disk follow the persisted `planten` blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: String,
    #[serde(rename = "naam")]
    pub name: String,
    #[serde(
        rename = "botanisch",
        default,
        deserialize_with = "non_empty_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub botanical_name: Option<String>,
    #[serde(rename = "soort", default)]
    pub kind: String,
    #[serde(rename = "prijs", default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(
        rename = "omschrijving",
        default,
        deserialize_with = "non_empty_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        rename = "afbeelding",
        default,
        deserialize_with = "non_empty_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

impl Plant {
    pub fn new(id: String, fields: PlantFields, image: Option<String>) -> Self {
        Self {
            id,
            name: fields.name,
            botanical_name: fields.botanical_name,
            kind: fields.kind,
            price: fields.price,
            description: fields.description,
            image,
        }
    }

    /// Overwrites every field the update carries. The image is only replaced
    /// when a new one is supplied.
    pub fn apply(&mut self, update: &PlantUpdate, image: Option<String>) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(botanical) = &update.botanical_name {
            self.botanical_name = normalize_optional(botanical);
        }
        if let Some(kind) = &update.kind {
            self.kind = kind.clone();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = &update.description {
            self.description = normalize_optional(description);
        }
        if image.is_some() {
            self.image = image;
        }
    }
}

/// Input for a new plant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantFields {
    pub name: String,
    pub botanical_name: Option<String>,
    pub kind: String,
    pub price: f64,
    pub description: Option<String>,
}

impl PlantFields {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            price,
            ..Default::default()
        }
    }

    pub fn with_botanical_name(mut self, botanical: impl Into<String>) -> Self {
        self.botanical_name = normalize_optional(&botanical.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_optional(&description.into());
        self
    }
}

/// Partial update for an existing plant. `None` leaves a field untouched;
/// an empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantUpdate {
    pub name: Option<String>,
    pub botanical_name: Option<String>,
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl PlantUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.botanical_name.is_none()
            && self.kind.is_none()
            && self.price.is_none()
            && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub id: String,
    pub quantity: u32,
}

impl SelectionEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quantity: MIN_QUANTITY,
        }
    }
}

/// A plant paired with the quantity it is exported with.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportItem {
    pub plant: Plant,
    pub quantity: u32,
}

impl ExportItem {
    pub fn line_total(&self) -> f64 {
        self.plant.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// The selection as a flat list, one of each.
    Flat,
    /// The selection with quantities and per-line totals.
    Basket,
}

impl ExportMode {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportMode::Flat => "planten.pdf",
            ExportMode::Basket => "planten_mandje.pdf",
        }
    }
}

/// Columns that can be included in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "afbeelding")]
    Image,
    #[serde(rename = "naam")]
    Name,
    #[serde(rename = "botanisch")]
    BotanicalName,
    #[serde(rename = "soort")]
    Kind,
    #[serde(rename = "prijs")]
    Price,
    #[serde(rename = "omschrijving")]
    Description,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Image,
        Column::Name,
        Column::BotanicalName,
        Column::Kind,
        Column::Price,
        Column::Description,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Column::Image => "afbeelding",
            Column::Name => "naam",
            Column::BotanicalName => "botanisch",
            Column::Kind => "soort",
            Column::Price => "prijs",
            Column::Description => "omschrijving",
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            Column::Image => "Afbeelding",
            Column::Name => "Naam",
            Column::BotanicalName => "Botanische naam",
            Column::Kind => "Soort",
            Column::Price => "Prijs",
            Column::Description => "Omschrijving",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "afbeelding" | "image" => Ok(Column::Image),
            "naam" | "name" => Ok(Column::Name),
            "botanisch" | "botanical" => Ok(Column::BotanicalName),
            "soort" | "kind" => Ok(Column::Kind),
            "prijs" | "price" => Ok(Column::Price),
            "omschrijving" | "description" => Ok(Column::Description),
            other => Err(format!("Unknown column: {}", other)),
        }
    }
}

fn normalize_optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| normalize_optional(&s)))
}

// Older records stored the raw form value, so prices may arrive as strings.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let price = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if price.is_finite() { price.max(0.0) } else { 0.0 })
}
