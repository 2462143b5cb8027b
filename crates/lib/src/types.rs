//! # Shared Types
//!
//! Data structures passed between the pipeline stages and returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single result row: arbitrary business/spatial attributes keyed by column name.
pub type ResultRow = Map<String, Value>;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Arithmetic mean of a set of points. Returns `None` for an empty slice.
    pub fn centroid(points: &[Coordinates]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(Self {
            lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
            lng: points.iter().map(|p| p.lng).sum::<f64>() / n,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

// --- Interpretation ---

/// Structured representation of a natural-language geospatial query.
///
/// Every field has a default so that partially-shaped model output still
/// deserializes; only output that is not JSON at all is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interpretation {
    pub query_type: String,
    pub analysis_type: String,
    pub location: Location,
    pub filters: Vec<Filter>,
    pub spatial_operations: Vec<SpatialOperation>,
    pub output: OutputSpec,
    pub enrich_with_places: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    #[serde(rename = "type")]
    pub kind: String,
    pub attribute: String,
    pub operator: String,
    pub value: Value,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialOperation {
    pub operation: String,
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    pub fields: Vec<String>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            limit: 100,
            order_by: None,
        }
    }
}

/// Where an interpretation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationSource {
    Model,
    Keyword,
}

// --- SQL ---

/// Whether a query was written by the model or produced from the fixed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlSource {
    Model,
    Template,
}

/// A SQL statement together with its positional (`$1`, `$2`, ...) bind parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedQuery {
    pub sql: String,
    pub params: Vec<String>,
    pub source: SqlSource,
}

// --- Pipeline response ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    Heatmap,
    Polygon,
    Polyline,
    Markers,
    None,
    Error,
}

/// The response of the natural-language query pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    /// The interpretation, pretty-printed as JSON.
    pub interpretation: String,
    pub sql_query: String,
    pub results: Vec<ResultRow>,
    pub visualization_type: VisualizationType,
    pub success: bool,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

impl QueryResponse {
    pub fn failed(query: &str, error: String) -> Self {
        Self {
            query: query.to_string(),
            interpretation: String::new(),
            sql_query: String::new(),
            results: Vec::new(),
            visualization_type: VisualizationType::Error,
            success: false,
            error: Some(error),
            debug: None,
        }
    }
}

// --- Task configuration ---

/// A fully resolved task: the provider key and its prompt templates.
#[derive(Clone, Debug, Default)]
pub struct ResolvedTask {
    pub provider: String,
    pub system_prompt: String,
    pub user_prompt: String,
}
