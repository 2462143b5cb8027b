//! # Places Enrichment
//!
//! Attaches nearby businesses from the maps provider to each result row that has a
//! `center`.

use crate::{
    constants::{ENRICHMENT_RADIUS_M, MAX_NEARBY_PLACES},
    errors::GeoError,
    providers::maps::{MapsProvider, Place},
    types::{Coordinates, Interpretation, ResultRow},
};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Maps a business filter value to a place type understood by the places search.
fn place_type_for(value: &str) -> Option<&'static str> {
    match value {
        "cafe" | "coffee" => Some("cafe"),
        "restaurant" => Some("restaurant"),
        "gym" => Some("gym"),
        "school" => Some("school"),
        "bank" => Some("bank"),
        "hospital" => Some("hospital"),
        "pharmacy" => Some("pharmacy"),
        "park" => Some("park"),
        _ => None,
    }
}

/// Place types requested by the interpretation's business filters, defaulting to `cafe`.
pub fn extract_place_types(interpretation: &Interpretation) -> Vec<&'static str> {
    let types: Vec<&'static str> = interpretation
        .filters
        .iter()
        .filter(|f| f.kind == "business")
        .filter_map(|f| f.value.as_str())
        .filter_map(|v| place_type_for(&v.to_lowercase()))
        .collect();
    if types.is_empty() {
        vec!["cafe"]
    } else {
        types
    }
}

fn row_center(row: &ResultRow) -> Option<Coordinates> {
    let center = row.get("center")?;
    serde_json::from_value(center.clone()).ok()
}

fn place_summary(place: &Place) -> Value {
    json!({
        "name": place.name,
        "type": place.types.first().map(String::as_str).unwrap_or("unknown"),
        "rating": place.rating,
        "location": place.location,
    })
}

/// Adds a `nearby_places` list to every row with a `center`.
///
/// Without a maps provider the rows are returned unchanged. A failed lookup for one
/// row gives that row an empty list and does not affect the others.
pub async fn enrich_with_places(
    maps: Option<&dyn MapsProvider>,
    mut rows: Vec<ResultRow>,
    interpretation: &Interpretation,
) -> Vec<ResultRow> {
    let Some(maps) = maps else {
        return rows;
    };
    let place_type = extract_place_types(interpretation)[0];
    info!("Enriching {} rows with nearby '{}' places", rows.len(), place_type);

    for row in rows.iter_mut() {
        let Some(center) = row_center(row) else {
            continue;
        };
        let nearby = match maps
            .places_nearby(center, ENRICHMENT_RADIUS_M, place_type)
            .await
        {
            Ok(places) => places
                .iter()
                .take(MAX_NEARBY_PLACES)
                .map(place_summary)
                .collect(),
            Err(e) => {
                warn!("Error fetching places near {center}: {e}");
                Vec::new()
            }
        };
        row.insert("nearby_places".to_string(), Value::Array(nearby));
    }
    rows
}

/// Status of the periodic point-of-interest refresh.
pub fn enrich_database(maps: Option<&dyn MapsProvider>) -> Result<Value, GeoError> {
    if maps.is_none() {
        return Err(GeoError::MissingMapsProvider);
    }
    Ok(json!({
        "status": "success",
        "message": "Database enrichment would be performed here",
        "note": "Implement based on your specific needs and rate limits",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Filter;

    fn business(value: &str) -> Filter {
        Filter {
            kind: "business".into(),
            value: json!(value),
            ..Default::default()
        }
    }

    #[test]
    fn place_types_follow_business_filters() {
        let mut interpretation = Interpretation::default();
        assert_eq!(extract_place_types(&interpretation), vec!["cafe"]);

        interpretation.filters = vec![business("Coffee"), business("Gym"), business("zoo")];
        assert_eq!(extract_place_types(&interpretation), vec!["cafe", "gym"]);

        interpretation.filters = vec![Filter {
            kind: "demographic".into(),
            value: json!("restaurant"),
            ..Default::default()
        }];
        assert_eq!(extract_place_types(&interpretation), vec!["cafe"]);
    }

    #[tokio::test]
    async fn without_maps_rows_are_unchanged() {
        let rows = crate::mock::mock_geospatial_rows();
        let enriched = enrich_with_places(None, rows.clone(), &Interpretation::default()).await;
        assert_eq!(rows, enriched);
        assert!(enrich_database(None).is_err());
    }
}
