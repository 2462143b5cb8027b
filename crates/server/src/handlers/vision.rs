//! # Vision Handlers
//!
//! Satellite and street-level imagery analysis, multi-location comparison, and
//! review sentiment.

use super::{AppError, AppState};
use axum::{extract::State, Json};
use geomind::{
    vision::{MultiLocationAnalysis, SatelliteAnalysis, StreetViewAnalysis},
    Coordinates,
};
use serde::Deserialize;
use serde_json::Value;

/// The largest zoom level the static maps service renders.
const MAX_ZOOM: u8 = 21;

// --- API Payloads ---

#[derive(Debug, Deserialize)]
pub struct SatelliteRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_analysis_type() -> String {
    "commercial_potential".to_string()
}

fn default_zoom() -> u8 {
    18
}

#[derive(Debug, Deserialize)]
pub struct StreetViewRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub heading: u16,
    #[serde(default = "default_focus")]
    pub analysis_focus: String,
}

fn default_focus() -> String {
    "storefront_quality".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CompareLocationsRequest {
    pub locations: Vec<Coordinates>,
    #[serde(default = "default_comparison")]
    pub analysis_type: String,
}

fn default_comparison() -> String {
    "comparative".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub reviews: Vec<String>,
    #[serde(default = "default_aspect")]
    pub aspect: String,
}

fn default_aspect() -> String {
    "overall".to_string()
}

// --- Handlers ---

pub async fn satellite_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SatelliteRequest>,
) -> Result<Json<SatelliteAnalysis>, AppError> {
    if payload.zoom > MAX_ZOOM {
        return Err(AppError::BadRequest(format!(
            "zoom must be between 0 and {MAX_ZOOM}, got {}",
            payload.zoom
        )));
    }
    let analysis = app_state
        .vision
        .analyze_satellite_image(payload.lat, payload.lng, payload.zoom, &payload.analysis_type)
        .await;
    Ok(Json(analysis))
}

pub async fn street_view_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<StreetViewRequest>,
) -> Result<Json<StreetViewAnalysis>, AppError> {
    if payload.heading > 360 {
        return Err(AppError::BadRequest(format!(
            "heading must be between 0 and 360 degrees, got {}",
            payload.heading
        )));
    }
    let analysis = app_state
        .vision
        .analyze_street_view(
            payload.lat,
            payload.lng,
            payload.heading,
            &payload.analysis_focus,
        )
        .await;
    Ok(Json(analysis))
}

pub async fn compare_locations_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CompareLocationsRequest>,
) -> Json<MultiLocationAnalysis> {
    Json(
        app_state
            .vision
            .analyze_multiple_locations(&payload.locations, &payload.analysis_type)
            .await,
    )
}

pub async fn sentiment_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SentimentRequest>,
) -> Json<Value> {
    Json(
        app_state
            .vision
            .analyze_sentiment_from_reviews(&payload.reviews, &payload.aspect)
            .await,
    )
}
