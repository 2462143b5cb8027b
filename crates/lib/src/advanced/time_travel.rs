//! Historical comparison of a location across a series of years.
//!
//! Historical imagery is not fetched from any archive: the enabled path returns
//! placeholder images with a simulated change analysis, and the disabled path a
//! richer mock that also carries predictions.

use crate::util::round_to;
use serde_json::{json, Map, Value};
use tracing::info;

pub const DEFAULT_YEARS: [i32; 4] = [2010, 2015, 2020, 2024];

#[derive(Clone, Debug, Default)]
pub struct TimeTravelAnalyzer {
    enabled: bool,
}

impl TimeTravelAnalyzer {
    /// `maps_configured` tells whether a mapping credential is available.
    pub fn new(maps_configured: bool) -> Self {
        Self {
            enabled: maps_configured,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_historical_comparison(&self, lat: f64, lng: f64, years: Option<Vec<i32>>) -> Value {
        let years = years.unwrap_or_else(|| DEFAULT_YEARS.to_vec());
        info!("Historical comparison at {lat},{lng} over {years:?}");
        if self.enabled {
            simulated_comparison(lat, lng, &years)
        } else {
            mock_comparison(lat, lng, &years)
        }
    }
}

/// Years between the first and last entries, widened so any pair of `i32` years fits.
fn span(years: &[i32]) -> i64 {
    match (years.first(), years.last()) {
        (Some(&first), Some(&last)) if years.len() >= 2 => i64::from(last) - i64::from(first),
        _ => 0,
    }
}

/// Pairs the years at `offset..` with the given descriptions, stopping at whichever runs out.
fn dated(years: &[i32], offset: usize, changes: &[&str]) -> Vec<String> {
    years
        .iter()
        .skip(offset)
        .zip(changes)
        .map(|(year, change)| format!("{year}: {change}"))
        .collect()
}

fn simulated_comparison(lat: f64, lng: f64, years: &[i32]) -> Value {
    let images: Vec<Value> = years
        .iter()
        .map(|year| {
            json!({
                "year": year,
                "image_url": format!("https://via.placeholder.com/640x640.png?text={year}"),
                "description": format!("Satellite view from {year}"),
            })
        })
        .collect();

    let mut key_changes = dated(
        years,
        1,
        &[
            "New commercial center constructed",
            "Metro line extension completed",
            "Residential tower boom began",
        ],
    );
    key_changes.push("Significant gentrification observed".to_string());

    json!({
        "location": { "lat": lat, "lng": lng },
        "years_analyzed": years,
        "images": images,
        "change_analysis": {
            "urbanization_level": "High - significant increase",
            "new_constructions": format!("{} major buildings", years.len() * 15),
            "vegetation_change": "-12% tree coverage",
            "infrastructure": "2 new roads, 1 metro station",
            "density_increase": "+45% population density",
        },
        "growth_rate": round_to(span(years) as f64 * 0.03, 2),
        "key_changes": key_changes,
        "success": true,
    })
}

fn mock_comparison(lat: f64, lng: f64, years: &[i32]) -> Value {
    let images: Vec<Value> = years
        .iter()
        .map(|year| {
            json!({
                "year": year,
                "image_url": format!("https://via.placeholder.com/640x640.png?text=Satellite+{year}"),
                "description": format!("Satellite imagery from {year}"),
            })
        })
        .collect();

    let key_changes = dated(
        years,
        0,
        &[
            "Predominantly residential area",
            "First shopping center opened",
            "Metro expansion completed",
            "Major vertical development, multiple towers",
        ],
    );

    let mut predictions = Map::new();
    if let Some(last) = years.last().copied().map(i64::from) {
        predictions.insert(
            (last + 5).to_string(),
            json!("Continued verticalization, +30% density expected"),
        );
        predictions.insert(
            (last + 10).to_string(),
            json!("Complete transformation to high-rise urban center"),
        );
    }

    json!({
        "location": { "lat": lat, "lng": lng },
        "years_analyzed": years,
        "images": images,
        "change_analysis": {
            "urbanization_level": "High - Area evolved from residential to mixed-use",
            "new_constructions": format!("{} new buildings", span(years) * 8),
            "vegetation_change": "-15% decrease in green areas",
            "infrastructure_improvements": [
                "New metro station (2015)",
                "Road widening project (2018)",
                "Public park renovation (2020)"
            ],
            "density_increase": "+52% population density",
            "commercial_growth": "+180% commercial establishments",
        },
        "growth_rate": round_to(span(years) as f64 * 0.035, 2),
        "key_changes": key_changes,
        "predictions": predictions,
        "mock": true,
        "note": "Enable Google Earth Engine API for real historical imagery",
        "success": true,
    })
}
