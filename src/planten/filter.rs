//! Catalog filtering.
//!
//! A filter string is a comma separated list of terms. A plant matches when any
//! term occurs (case-insensitively) in its name, botanical name, kind or
//! description, so `zon, schaduw` finds everything mentioning sun OR shade.
//! An empty filter matches everything.

use crate::model::Plant;

/// Splits a filter string into trimmed, lower-cased, non-empty terms.
pub fn parse_terms(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Returns true if the plant matches any of the (already parsed) terms.
pub fn matches_terms(plant: &Plant, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }

    let fields = [
        plant.name.to_lowercase(),
        plant
            .botanical_name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase(),
        plant.kind.to_lowercase(),
        plant
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase(),
    ];

    terms
        .iter()
        .any(|term| fields.iter().any(|field| field.contains(term.as_str())))
}

pub fn matches(plant: &Plant, filter: &str) -> bool {
    matches_terms(plant, &parse_terms(filter))
}

/// Returns the matching plants in catalog order.
pub fn filter_plants<'a>(plants: &'a [Plant], filter: &str) -> Vec<&'a Plant> {
    let terms = parse_terms(filter);
    plants
        .iter()
        .filter(|plant| matches_terms(plant, &terms))
        .collect()
}
