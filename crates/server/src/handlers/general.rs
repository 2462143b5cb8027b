//! # General Route Handlers
//!
//! The root banner, the service health report, the natural-language query
//! pipeline, the sample query catalogue, and the enrichment trigger.

use super::{AppError, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use geomind::{enrich::enrich_database, GeoError, QueryResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

// --- API Payloads for General Handlers ---

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<Value>,
}

fn availability(enabled: bool) -> &'static str {
    if enabled {
        "healthy"
    } else {
        "disabled"
    }
}

// --- General-Purpose Handlers ---

/// The handler for the root (`/`) endpoint.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "GeoMindIA - Intelligent Geospatial Analysis",
        "status": "running",
        "endpoints": ["/query", "/health", "/sample-queries"],
    }))
}

/// Reports the state of every backing service. Never fails: an unreachable
/// database shows up as an `unhealthy: ...` entry.
pub async fn health_check(State(app_state): State<AppState>) -> Json<Value> {
    let database = app_state.executor.storage.check_connection().await;
    Json(json!({
        "api": "healthy",
        "database": database,
        "llm": availability(app_state.executor.interpreter.is_enabled()),
        "maps": availability(app_state.maps.is_some()),
        "vision": availability(app_state.vision.is_enabled()),
        "routing": availability(app_state.routing.is_enabled()),
        "advanced_features": "healthy",
    }))
}

/// The primary handler for the `/query` endpoint: interpretation, SQL generation,
/// execution, and enrichment. Stage details are only returned with `?debug=true`.
pub async fn query_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<QueryRequest>,
) -> Json<QueryResponse> {
    info!("Received query: '{}'", payload.query);
    let mut response = app_state
        .executor
        .process_query(&payload.query, payload.context.as_ref())
        .await;
    if !debug_params.debug.unwrap_or(false) {
        response.debug = None;
    }
    Json(response)
}

pub async fn sample_queries() -> Json<Value> {
    Json(json!({
        "samples": [
            {
                "category": "Business Analysis",
                "queries": [
                    "Show me areas with high potential for coffee shops considering young population density and no competitors within 500 meters",
                    "Find commercial zones with high foot traffic near public transportation",
                    "Compare street view quality of 3 potential restaurant locations",
                    "Analyze satellite imagery of downtown for commercial development potential"
                ]
            },
            {
                "category": "Route & Accessibility",
                "queries": [
                    "Show areas reachable within 10 minutes walking from metro station",
                    "Optimize route to visit all 5 potential store locations today",
                    "Find location most accessible to hospitals, schools, and transit",
                    "Calculate best meeting point for team distributed across the city"
                ]
            },
            {
                "category": "Urban Planning",
                "queries": [
                    "Show areas lacking green spaces within 1km radius",
                    "Find zones with high population density but low public service coverage",
                    "Rank neighborhoods by walkability and accessibility scores"
                ]
            },
            {
                "category": "Comparative Analysis",
                "queries": [
                    "Compare best 3 neighborhoods for opening a tech coworking space",
                    "Find undervalued areas likely to gentrify in 2 years",
                    "Identify food deserts that need grocery stores",
                    "Evaluate foot traffic indicators from street view across multiple locations"
                ]
            }
        ]
    }))
}

/// Triggers the periodic point-of-interest refresh.
pub async fn enrich_data_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let result = match enrich_database(app_state.maps.as_deref()) {
        Ok(result) => result,
        Err(GeoError::MissingMapsProvider) => json!({"error": "Google Maps API not configured"}),
        Err(e) => return Err(e.into()),
    };
    Ok(Json(json!({ "success": true, "result": result })))
}
