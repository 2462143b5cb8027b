//! # Advanced Feature Handlers
//!
//! Photo identification, historical imagery comparison, what-if scenarios, and
//! multi-city comparison.

use super::AppState;
use axum::{extract::State, Json};
use geomind::advanced::{
    compare_cities, multi_city::CityComparison, photo::PhotoAnalysis, simulate_scenario,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

// --- API Payloads ---

#[derive(Debug, Deserialize)]
pub struct PhotoAnalysisRequest {
    /// Base64 image content, optionally as a `data:` URI.
    pub image_data: String,
    #[serde(default = "default_photo_analysis")]
    pub analysis_type: String,
}

fn default_photo_analysis() -> String {
    "location".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TimeTravelRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub years: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub struct WhatIfRequest {
    pub lat: f64,
    pub lng: f64,
    pub scenario_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompareCitiesRequest {
    pub cities: Vec<String>,
    #[serde(default = "empty_criteria")]
    pub criteria: Value,
    #[serde(default = "default_business_type")]
    pub business_type: String,
}

fn empty_criteria() -> Value {
    Value::Object(Map::new())
}

fn default_business_type() -> String {
    "general".to_string()
}

fn feature_status(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "mock"
    }
}

// --- Handlers ---

pub async fn photo_analysis_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<PhotoAnalysisRequest>,
) -> Json<PhotoAnalysis> {
    Json(
        app_state
            .photo
            .analyze_uploaded_photo(&payload.image_data, &payload.analysis_type)
            .await,
    )
}

pub async fn time_travel_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<TimeTravelRequest>,
) -> Json<Value> {
    Json(
        app_state
            .time_travel
            .get_historical_comparison(payload.lat, payload.lng, payload.years),
    )
}

pub async fn what_if_handler(Json(payload): Json<WhatIfRequest>) -> Json<Value> {
    Json(simulate_scenario(
        payload.lat,
        payload.lng,
        &payload.scenario_type,
        &payload.parameters,
    ))
}

pub async fn compare_cities_handler(
    Json(payload): Json<CompareCitiesRequest>,
) -> Json<CityComparison> {
    Json(compare_cities(
        &payload.cities,
        payload.criteria,
        &payload.business_type,
    ))
}

pub async fn advanced_features(State(app_state): State<AppState>) -> Json<Value> {
    Json(json!({
        "features": [
            {
                "name": "Photo Analysis",
                "endpoint": "/advanced/photo-analysis",
                "description": "Upload photo and identify location with AI",
                "status": feature_status(app_state.photo.is_enabled()),
            },
            {
                "name": "Time Travel",
                "endpoint": "/advanced/time-travel",
                "description": "See historical changes in satellite imagery",
                "status": feature_status(app_state.time_travel.is_enabled()),
            },
            {
                "name": "What-If Simulator",
                "endpoint": "/advanced/what-if",
                "description": "Simulate urban changes and predict impacts",
                "status": "enabled",
            },
            {
                "name": "Multi-City Comparison",
                "endpoint": "/advanced/compare-cities",
                "description": "Automatically compare multiple cities",
                "status": "enabled",
            }
        ]
    }))
}
