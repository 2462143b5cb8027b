pub mod google;

use crate::{errors::GeoError, providers::ai::ImageData, types::Coordinates};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::Serialize;
use std::fmt::Debug;

/// A place returned by a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: Option<String>,
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub vicinity: Option<String>,
    pub location: Option<Coordinates>,
}

/// A distance or duration with its human-readable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    /// Meters.
    pub distance: Measure,
    /// Seconds.
    pub duration: Measure,
    pub step_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub waypoint_order: Vec<usize>,
    pub legs: Vec<RouteLeg>,
    pub overview_polyline: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
    pub optimize_waypoints: bool,
    pub mode: String,
}

impl DirectionsRequest {
    /// A point-to-point request without waypoints.
    pub fn between(origin: Coordinates, destination: Coordinates, mode: &str) -> Self {
        Self {
            origin,
            destination,
            waypoints: Vec::new(),
            optimize_waypoints: false,
            mode: mode.to_string(),
        }
    }
}

/// A trait for interacting with a maps platform.
///
/// This trait covers the place search, routing, and imagery calls used by
/// enrichment, routing analysis, and imagery analysis.
#[async_trait]
pub trait MapsProvider: Send + Sync + Debug + DynClone {
    /// Places of one type within `radius_m` meters of `location`, in relevance order.
    async fn places_nearby(
        &self,
        location: Coordinates,
        radius_m: u32,
        place_type: &str,
    ) -> Result<Vec<Place>, GeoError>;

    /// Candidate routes, best first. An empty list means no route was found.
    async fn directions(&self, request: &DirectionsRequest) -> Result<Vec<Route>, GeoError>;

    /// Travel time in seconds from `origin` to each destination, `None` where unreachable.
    async fn distance_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
        mode: &str,
    ) -> Result<Vec<Option<f64>>, GeoError>;

    /// A static satellite image URL, without credentials.
    fn satellite_image_url(&self, center: Coordinates, zoom: u8) -> String;

    /// A street-level image URL, without credentials.
    fn street_view_url(&self, location: Coordinates, heading: u16) -> String;

    /// Downloads an image from a URL produced by this provider.
    async fn fetch_image(&self, url: &str) -> Result<ImageData, GeoError>;
}

dyn_clone::clone_trait_object!(MapsProvider);
