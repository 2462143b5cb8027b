//! # Routing Handlers

use super::{AppError, AppState};
use axum::{extract::State, Json};
use geomind::{
    routing::{Accessibility, Isochrone, MeetingPoint, OptimizedRoute, RoutingOutcome},
    Coordinates,
};
use serde::Deserialize;

// --- API Payloads ---

#[derive(Debug, Deserialize)]
pub struct RouteOptimizationRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    #[serde(default)]
    pub waypoints: Vec<Coordinates>,
    #[serde(default = "default_driving")]
    pub mode: String,
}

fn default_driving() -> String {
    "driving".to_string()
}

#[derive(Debug, Deserialize)]
pub struct IsochroneRequest {
    pub center: Coordinates,
    pub duration_minutes: u32,
    #[serde(default = "default_walking")]
    pub mode: String,
    #[serde(default)]
    pub intervals: Option<Vec<u32>>,
}

fn default_walking() -> String {
    "walking".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AccessibilityRequest {
    pub location: Coordinates,
    #[serde(default)]
    pub poi_types: Option<Vec<String>>,
    #[serde(default = "default_max_duration")]
    pub max_duration_minutes: u32,
}

fn default_max_duration() -> u32 {
    15
}

#[derive(Debug, Deserialize)]
pub struct MeetingPointRequest {
    pub locations: Vec<Coordinates>,
    #[serde(default = "default_transit")]
    pub mode: String,
}

fn default_transit() -> String {
    "transit".to_string()
}

// --- Handlers ---

pub async fn optimize_route_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<RouteOptimizationRequest>,
) -> Json<RoutingOutcome<OptimizedRoute>> {
    Json(
        app_state
            .routing
            .optimize_multi_point_route(
                payload.origin,
                payload.destination,
                &payload.waypoints,
                &payload.mode,
            )
            .await,
    )
}

pub async fn isochrone_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<IsochroneRequest>,
) -> Result<Json<Isochrone>, AppError> {
    if payload.duration_minutes == 0 {
        return Err(AppError::BadRequest(
            "duration_minutes must be positive".to_string(),
        ));
    }
    let isochrone = app_state
        .routing
        .calculate_isochrone(
            payload.center,
            payload.duration_minutes,
            &payload.mode,
            payload.intervals,
        )
        .await;
    Ok(Json(isochrone))
}

pub async fn accessibility_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AccessibilityRequest>,
) -> Json<Accessibility> {
    Json(
        app_state
            .routing
            .analyze_accessibility(
                payload.location,
                payload.poi_types,
                payload.max_duration_minutes,
            )
            .await,
    )
}

pub async fn meeting_point_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<MeetingPointRequest>,
) -> Json<RoutingOutcome<MeetingPoint>> {
    Json(
        app_state
            .routing
            .find_optimal_meeting_point(&payload.locations, &payload.mode)
            .await,
    )
}
