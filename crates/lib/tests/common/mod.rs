#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mock providers and helpers so tests run without network access, API
//! keys, or a database.

use async_trait::async_trait;
use dotenvy::dotenv;
use geomind::{
    errors::GeoError,
    providers::{
        ai::{AiProvider, ImageData},
        db::storage::SpatialStorage,
        maps::{DirectionsRequest, MapsProvider, Measure, Place, Route, RouteLeg},
    },
    types::{Coordinates, GeneratedQuery, ResolvedTask, ResultRow},
    TaskRegistry,
};
use serde_json::json;
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Once, RwLock},
};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

// --- Mock AI Provider ---

/// Answers with scripted responses in order, recording every prompt it receives.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub image_mime_types: Arc<RwLock<Vec<String>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            image_mime_types: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
        }
    }

    fn next_response(&self, system_prompt: &str, user_prompt: &str) -> String {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.responses
            .write()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "Default mock response".to_string())
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, GeoError> {
        Ok(self.next_response(system_prompt, user_prompt))
    }

    async fn generate_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image: &ImageData,
    ) -> Result<String, GeoError> {
        self.image_mime_types
            .write()
            .unwrap()
            .push(image.mime_type.clone());
        Ok(self.next_response(system_prompt, user_prompt))
    }
}

/// An AI provider whose every call fails.
#[derive(Clone, Debug)]
pub struct FailingAiProvider;

#[async_trait]
impl AiProvider for FailingAiProvider {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String, GeoError> {
        Err(GeoError::AiApi("quota exceeded".to_string()))
    }

    async fn generate_with_image(
        &self,
        _system: &str,
        _user: &str,
        _image: &ImageData,
    ) -> Result<String, GeoError> {
        Err(GeoError::AiApi("quota exceeded".to_string()))
    }
}

/// A registry where every named task is served by `provider` with simple templates.
pub fn registry_with(provider: Box<dyn AiProvider>, task_names: &[&str]) -> TaskRegistry {
    let mut providers: HashMap<String, Box<dyn AiProvider>> = HashMap::new();
    providers.insert("mock".to_string(), provider);
    let tasks = task_names
        .iter()
        .map(|name| {
            (
                name.to_string(),
                ResolvedTask {
                    provider: "mock".to_string(),
                    system_prompt: format!("system prompt for {name}"),
                    user_prompt: "{analysis_prompt}{count}{analyses}{aspect}{reviews}"
                        .to_string(),
                },
            )
        })
        .collect();
    TaskRegistry::new(Arc::new(providers), Arc::new(tasks))
}

// --- Mock Storage ---

/// Storage answering with fixed rows, or failing when `rows` is `None`.
#[derive(Clone, Debug, Default)]
pub struct MockStorage {
    pub rows: Option<Vec<ResultRow>>,
    pub executed: Arc<RwLock<Vec<GeneratedQuery>>>,
}

impl MockStorage {
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<ResultRow>) -> Self {
        Self {
            rows: Some(rows),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SpatialStorage for MockStorage {
    fn name(&self) -> &str {
        "MockDB"
    }

    async fn check_connection(&self) -> String {
        match self.rows {
            Some(_) => "healthy".to_string(),
            None => "unhealthy: connection refused".to_string(),
        }
    }

    async fn execute_query(&self, query: &GeneratedQuery) -> Result<Vec<ResultRow>, GeoError> {
        self.executed.write().unwrap().push(query.clone());
        self.rows
            .clone()
            .ok_or_else(|| GeoError::StorageConnection("connection refused".to_string()))
    }

    async fn initialize_schema(&self) -> Result<(), GeoError> {
        Ok(())
    }
}

// --- Mock Maps Provider ---

/// A maps provider with canned answers. Travel time in the distance matrix grows
/// with the distance between the points.
#[derive(Clone, Debug, Default)]
pub struct MockMapsProvider {
    pub fail_places: bool,
    pub place_calls: Arc<RwLock<Vec<(Coordinates, u32, String)>>>,
}

pub fn place(name: &str, place_type: &str, location: Coordinates) -> Place {
    Place {
        name: Some(name.to_string()),
        types: vec![place_type.to_string(), "establishment".to_string()],
        rating: Some(4.5),
        vicinity: Some("Rua dos Andradas".to_string()),
        location: Some(location),
    }
}

#[async_trait]
impl MapsProvider for MockMapsProvider {
    async fn places_nearby(
        &self,
        location: Coordinates,
        radius_m: u32,
        place_type: &str,
    ) -> Result<Vec<Place>, GeoError> {
        self.place_calls
            .write()
            .unwrap()
            .push((location, radius_m, place_type.to_string()));
        if self.fail_places {
            return Err(GeoError::MapsApi("OVER_QUERY_LIMIT".to_string()));
        }
        Ok((0..7)
            .map(|i| {
                let offset = f64::from(i) * 0.001;
                place(
                    &format!("{place_type} {i}"),
                    place_type,
                    Coordinates::new(location.lat + offset, location.lng + offset),
                )
            })
            .collect())
    }

    async fn directions(&self, request: &DirectionsRequest) -> Result<Vec<Route>, GeoError> {
        let mut stops = vec![request.origin];
        stops.extend(request.waypoints.iter().copied());
        stops.push(request.destination);
        let legs = stops
            .windows(2)
            .map(|pair| RouteLeg {
                start_location: pair[0],
                end_location: pair[1],
                distance: Measure {
                    text: "1.5 km".to_string(),
                    value: 1500.0,
                },
                duration: Measure {
                    text: "5 mins".to_string(),
                    value: 300.0,
                },
                step_count: 3,
            })
            .collect();
        Ok(vec![Route {
            waypoint_order: (0..request.waypoints.len()).rev().collect(),
            legs,
            overview_polyline: "abc123".to_string(),
        }])
    }

    async fn distance_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
        _mode: &str,
    ) -> Result<Vec<Option<f64>>, GeoError> {
        Ok(destinations
            .iter()
            .map(|d| {
                let degrees = ((d.lat - origin.lat).powi(2) + (d.lng - origin.lng).powi(2)).sqrt();
                Some(degrees * 100_000.0 / 10.0)
            })
            .collect())
    }

    fn satellite_image_url(&self, center: Coordinates, zoom: u8) -> String {
        format!("http://maps.test/staticmap?center={center}&zoom={zoom}")
    }

    fn street_view_url(&self, location: Coordinates, heading: u16) -> String {
        format!("http://maps.test/streetview?location={location}&heading={heading}")
    }

    async fn fetch_image(&self, _url: &str) -> Result<ImageData, GeoError> {
        ImageData::from_bytes(png_bytes())
    }
}

/// The 8-byte PNG signature followed by a few filler bytes.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 13]);
    bytes
}

pub fn row_at(name: &str, lat: f64, lng: f64) -> ResultRow {
    match json!({ "name": name, "score": 80.0, "center": { "lat": lat, "lng": lng } }) {
        serde_json::Value::Object(map) => map,
        _ => ResultRow::new(),
    }
}
