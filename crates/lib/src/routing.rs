//! # Routing and Accessibility
//!
//! Multi-stop route optimization, isochrones (areas reachable within a travel time),
//! accessibility scoring against everyday points of interest, and meeting-point
//! search. Each operation serves a mock result when no maps provider is configured or
//! when the provider fails.

use crate::{
    constants::{ACCESSIBILITY_RADIUS_M, DISTANCE_MATRIX_BATCH, MEETING_POINT_RADIUS_M},
    errors::GeoError,
    providers::maps::{DirectionsRequest, MapsProvider},
    types::Coordinates,
    util::{round_to, title_case},
};
use serde::Serialize;
use std::{collections::BTreeMap, f64::consts::PI};
use tracing::{info, warn};

const ISOCHRONE_RINGS: usize = 4;
const POINTS_PER_RING: usize = 12;
const MOCK_ISOCHRONE_VERTICES: usize = 16;
const KM_PER_DEGREE: f64 = 111.0;

pub const DEFAULT_POI_TYPES: [&str; 5] = [
    "transit_station",
    "hospital",
    "school",
    "supermarket",
    "pharmacy",
];

fn is_false(value: &bool) -> bool {
    !*value
}

/// Either a result or a `{error, success: false}` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RoutingOutcome<T> {
    Done(T),
    Failed { error: String, success: bool },
}

impl<T> RoutingOutcome<T> {
    fn failed(error: &str) -> Self {
        RoutingOutcome::Failed {
            error: error.to_string(),
            success: false,
        }
    }
}

// --- Result payloads ---

#[derive(Debug, Clone, Serialize)]
pub struct LegSummary {
    pub start: Coordinates,
    pub end: Coordinates,
    pub distance: String,
    pub duration: String,
    pub steps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedRoute {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
    pub optimized_order: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance_meters: Option<f64>,
    pub total_distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_seconds: Option<f64>,
    pub total_duration_minutes: f64,
    pub mode: String,
    pub polyline: String,
    pub legs: Vec<LegSummary>,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IsochroneRing {
    pub duration_minutes: u32,
    /// Closed ring of `[lng, lat]` pairs.
    pub polygon: Vec<[f64; 2]>,
    pub points_count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Isochrone {
    pub center: Coordinates,
    pub mode: String,
    pub max_duration_minutes: u32,
    pub isochrones: Vec<IsochroneRing>,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoiAccess {
    pub name: String,
    pub duration_minutes: f64,
    pub distance_meters: f64,
    pub score: f64,
    pub location: Coordinates,
    pub accessible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Accessibility {
    pub location: Coordinates,
    pub accessibility_scores: BTreeMap<String, PoiAccess>,
    pub overall_score: f64,
    pub max_duration_minutes: u32,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingVenue {
    pub name: Option<String>,
    pub location: Coordinates,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub total_travel_time_minutes: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingPoint {
    pub participant_locations: Vec<Coordinates>,
    pub optimal_meeting_point: Option<MeetingVenue>,
    pub mode: String,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// --- Analyzer ---

#[derive(Clone, Debug, Default)]
pub struct RoutingAnalyzer {
    maps: Option<Box<dyn MapsProvider>>,
}

impl RoutingAnalyzer {
    pub fn new(maps: Option<Box<dyn MapsProvider>>) -> Self {
        Self { maps }
    }

    pub fn is_enabled(&self) -> bool {
        self.maps.is_some()
    }

    /// Plans a route from `origin` to `destination` through every waypoint, letting the
    /// provider reorder the waypoints.
    pub async fn optimize_multi_point_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        waypoints: &[Coordinates],
        mode: &str,
    ) -> RoutingOutcome<OptimizedRoute> {
        let Some(maps) = self.maps.as_deref() else {
            return RoutingOutcome::Done(mock_optimized_route(origin, destination, waypoints, mode));
        };

        let request = DirectionsRequest {
            origin,
            destination,
            waypoints: waypoints.to_vec(),
            optimize_waypoints: true,
            mode: mode.to_string(),
        };
        let routes = match maps.directions(&request).await {
            Ok(routes) => routes,
            Err(e) => {
                warn!("Route optimization failed, serving mock route: {e}");
                return RoutingOutcome::Done(mock_optimized_route(
                    origin,
                    destination,
                    waypoints,
                    mode,
                ));
            }
        };
        let Some(route) = routes.into_iter().next() else {
            return RoutingOutcome::failed("No route found");
        };

        let optimized_order = if route.waypoint_order.is_empty() {
            (0..waypoints.len()).collect()
        } else {
            route.waypoint_order
        };
        let total_distance: f64 = route.legs.iter().map(|l| l.distance.value).sum();
        let total_duration: f64 = route.legs.iter().map(|l| l.duration.value).sum();

        RoutingOutcome::Done(OptimizedRoute {
            origin,
            destination,
            waypoints: waypoints.to_vec(),
            optimized_order,
            total_distance_meters: Some(total_distance),
            total_distance_km: round_to(total_distance / 1000.0, 2),
            total_duration_seconds: Some(total_duration),
            total_duration_minutes: round_to(total_duration / 60.0, 1),
            mode: mode.to_string(),
            polyline: route.overview_polyline,
            legs: route
                .legs
                .into_iter()
                .map(|leg| LegSummary {
                    start: leg.start_location,
                    end: leg.end_location,
                    distance: leg.distance.text,
                    duration: leg.duration.text,
                    steps: leg.step_count,
                })
                .collect(),
            success: true,
            mock: false,
            note: None,
        })
    }

    /// Computes the areas reachable from `center` within each interval (minutes).
    ///
    /// Without explicit intervals, thirds of `duration_minutes` are used.
    pub async fn calculate_isochrone(
        &self,
        center: Coordinates,
        duration_minutes: u32,
        mode: &str,
        intervals: Option<Vec<u32>>,
    ) -> Isochrone {
        let intervals = intervals.unwrap_or_else(|| default_intervals(duration_minutes));

        let Some(maps) = self.maps.as_deref() else {
            return mock_isochrone(center, duration_minutes, mode, &intervals);
        };
        match isochrone_with_maps(maps, center, duration_minutes, mode, &intervals).await {
            Ok(isochrones) => Isochrone {
                center,
                mode: mode.to_string(),
                max_duration_minutes: duration_minutes,
                isochrones,
                success: true,
                mock: false,
                note: None,
            },
            Err(e) => {
                warn!("Isochrone calculation failed, serving mock isochrone: {e}");
                mock_isochrone(center, duration_minutes, mode, &intervals)
            }
        }
    }

    /// Scores how quickly the nearest point of each type can be reached on foot.
    pub async fn analyze_accessibility(
        &self,
        location: Coordinates,
        poi_types: Option<Vec<String>>,
        max_duration_minutes: u32,
    ) -> Accessibility {
        let poi_types = poi_types
            .unwrap_or_else(|| DEFAULT_POI_TYPES.iter().map(|t| t.to_string()).collect());

        let Some(maps) = self.maps.as_deref() else {
            return mock_accessibility(location, &poi_types, max_duration_minutes);
        };
        match accessibility_with_maps(maps, location, &poi_types, max_duration_minutes).await {
            Ok(scores) if !scores.is_empty() => {
                let overall = mean(scores.values().map(|s| s.score));
                Accessibility {
                    location,
                    accessibility_scores: scores,
                    overall_score: round_to(overall, 1),
                    max_duration_minutes,
                    success: true,
                    mock: false,
                    note: None,
                }
            }
            Ok(_) => {
                warn!("No reachable points of interest found, serving mock accessibility");
                mock_accessibility(location, &poi_types, max_duration_minutes)
            }
            Err(e) => {
                warn!("Accessibility analysis failed, serving mock accessibility: {e}");
                mock_accessibility(location, &poi_types, max_duration_minutes)
            }
        }
    }

    /// Finds the café near the participants' centroid with the least total travel time.
    pub async fn find_optimal_meeting_point(
        &self,
        locations: &[Coordinates],
        mode: &str,
    ) -> RoutingOutcome<MeetingPoint> {
        let Some(centroid) = Coordinates::centroid(locations).filter(|_| locations.len() >= 2)
        else {
            return RoutingOutcome::failed("Need at least 2 locations");
        };

        let Some(maps) = self.maps.as_deref() else {
            return RoutingOutcome::Done(mock_meeting_point(locations, centroid, mode));
        };
        match meeting_point_with_maps(maps, locations, centroid, mode).await {
            Ok(venue) => RoutingOutcome::Done(MeetingPoint {
                participant_locations: locations.to_vec(),
                optimal_meeting_point: venue,
                mode: mode.to_string(),
                success: true,
                mock: false,
                note: None,
            }),
            Err(e) => {
                warn!("Meeting point search failed, serving mock meeting point: {e}");
                RoutingOutcome::Done(mock_meeting_point(locations, centroid, mode))
            }
        }
    }
}

async fn isochrone_with_maps(
    maps: &dyn MapsProvider,
    center: Coordinates,
    duration_minutes: u32,
    mode: &str,
    intervals: &[u32],
) -> Result<Vec<IsochroneRing>, GeoError> {
    let points = sample_points(center, duration_minutes, mode);
    info!(
        "Computing isochrone from {center} with {} sample points",
        points.len()
    );

    let mut durations = Vec::with_capacity(points.len());
    for batch in points.chunks(DISTANCE_MATRIX_BATCH) {
        let mut batch_durations = maps.distance_matrix(center, batch, mode).await?;
        batch_durations.resize(batch.len(), None);
        durations.extend(batch_durations);
    }

    let max_interval = intervals.iter().copied().max().unwrap_or(0);
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();

    let mut rings = Vec::new();
    for interval in sorted {
        let reachable: Vec<Coordinates> = points
            .iter()
            .zip(&durations)
            .filter(|(_, d)| matches!(d, Some(secs) if secs / 60.0 <= f64::from(interval)))
            .map(|(p, _)| *p)
            .collect();
        if reachable.is_empty() {
            continue;
        }
        rings.push(IsochroneRing {
            duration_minutes: interval,
            points_count: reachable.len(),
            polygon: points_to_polygon(&reachable, center),
            color: isochrone_color(interval, max_interval),
        });
    }
    Ok(rings)
}

async fn accessibility_with_maps(
    maps: &dyn MapsProvider,
    location: Coordinates,
    poi_types: &[String],
    max_duration_minutes: u32,
) -> Result<BTreeMap<String, PoiAccess>, GeoError> {
    let mut scores = BTreeMap::new();
    for poi_type in poi_types {
        let places = maps
            .places_nearby(location, ACCESSIBILITY_RADIUS_M, poi_type)
            .await?;
        let Some(closest) = places.into_iter().next() else {
            continue;
        };
        let Some(poi_location) = closest.location else {
            continue;
        };

        let routes = maps
            .directions(&DirectionsRequest::between(location, poi_location, "walking"))
            .await?;
        let Some(leg) = routes.first().and_then(|r| r.legs.first()) else {
            continue;
        };

        let duration_min = leg.duration.value / 60.0;
        scores.insert(
            poi_type.clone(),
            PoiAccess {
                name: closest.name.unwrap_or_else(|| "Unknown".to_string()),
                duration_minutes: round_to(duration_min, 1),
                distance_meters: leg.distance.value,
                score: round_to(access_score(duration_min, max_duration_minutes), 1),
                location: poi_location,
                accessible: duration_min <= f64::from(max_duration_minutes),
            },
        );
    }
    Ok(scores)
}

async fn meeting_point_with_maps(
    maps: &dyn MapsProvider,
    locations: &[Coordinates],
    centroid: Coordinates,
    mode: &str,
) -> Result<Option<MeetingVenue>, GeoError> {
    let places = maps
        .places_nearby(centroid, MEETING_POINT_RADIUS_M, "cafe")
        .await?;

    let mut best: Option<(f64, MeetingVenue)> = None;
    for place in places.into_iter().take(5) {
        let Some(place_location) = place.location else {
            continue;
        };
        let mut total_seconds = 0.0;
        for origin in locations {
            let routes = maps
                .directions(&DirectionsRequest::between(*origin, place_location, mode))
                .await?;
            if let Some(leg) = routes.first().and_then(|r| r.legs.first()) {
                total_seconds += leg.duration.value;
            }
        }
        if best.as_ref().map_or(true, |(min, _)| total_seconds < *min) {
            best = Some((
                total_seconds,
                MeetingVenue {
                    name: place.name,
                    location: place_location,
                    address: place.vicinity,
                    rating: place.rating,
                    total_travel_time_minutes: round_to(total_seconds / 60.0, 1),
                },
            ));
        }
    }
    Ok(best.map(|(_, venue)| venue))
}

// --- Geometry helpers ---

/// `[d/3, 2d/3, d]` with integer division.
pub fn default_intervals(duration_minutes: u32) -> Vec<u32> {
    let two_thirds = u64::from(duration_minutes) * 2 / 3;
    vec![
        duration_minutes / 3,
        u32::try_from(two_thirds).unwrap_or(u32::MAX),
        duration_minutes,
    ]
}

/// Average travel speed in km/h for a travel mode.
pub fn mode_speed_kmh(mode: &str) -> f64 {
    match mode {
        "bicycling" => 15.0,
        "driving" => 40.0,
        "transit" => 25.0,
        _ => 5.0,
    }
}

/// Concentric rings of sample points, sized by how far `mode` travels in `max_minutes`.
pub fn sample_points(center: Coordinates, max_minutes: u32, mode: &str) -> Vec<Coordinates> {
    let max_distance_km = f64::from(max_minutes) / 60.0 * mode_speed_kmh(mode);
    let lng_scale = KM_PER_DEGREE * center.lat.to_radians().cos();

    let mut points = Vec::with_capacity(ISOCHRONE_RINGS * POINTS_PER_RING);
    for ring in 1..=ISOCHRONE_RINGS {
        let radius_km = max_distance_km / ISOCHRONE_RINGS as f64 * ring as f64;
        for i in 0..POINTS_PER_RING {
            let angle = 2.0 * PI / POINTS_PER_RING as f64 * i as f64;
            points.push(Coordinates::new(
                center.lat + radius_km / KM_PER_DEGREE * angle.cos(),
                center.lng + radius_km / lng_scale * angle.sin(),
            ));
        }
    }
    points
}

/// Orders points by their angle around `center` and closes the ring.
pub fn points_to_polygon(points: &[Coordinates], center: Coordinates) -> Vec<[f64; 2]> {
    let angle = |p: &Coordinates| (p.lat - center.lat).atan2(p.lng - center.lng);
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| angle(a).total_cmp(&angle(b)));

    let mut polygon: Vec<[f64; 2]> = sorted.iter().map(|p| [p.lng, p.lat]).collect();
    if let Some(first) = polygon.first().copied() {
        polygon.push(first);
    }
    polygon
}

/// Green for the nearest third of the range, amber for the middle, red for the rest.
pub fn isochrone_color(interval: u32, max_interval: u32) -> &'static str {
    if max_interval == 0 {
        return "#10b981";
    }
    let ratio = f64::from(interval) / f64::from(max_interval);
    if ratio <= 0.33 {
        "#10b981"
    } else if ratio <= 0.66 {
        "#f59e0b"
    } else {
        "#ef4444"
    }
}

/// `max(0, 10 − duration/max × 10)`; zero when `max_minutes` is zero.
pub fn access_score(duration_minutes: f64, max_minutes: u32) -> f64 {
    if max_minutes == 0 {
        return 0.0;
    }
    (10.0 - duration_minutes / f64::from(max_minutes) * 10.0).max(0.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// --- Mock results ---

fn mock_optimized_route(
    origin: Coordinates,
    destination: Coordinates,
    waypoints: &[Coordinates],
    mode: &str,
) -> OptimizedRoute {
    let total_points = (waypoints.len() + 2) as f64;
    OptimizedRoute {
        origin,
        destination,
        waypoints: waypoints.to_vec(),
        optimized_order: (0..waypoints.len()).collect(),
        total_distance_meters: None,
        total_distance_km: round_to(total_points * 1.5, 2),
        total_duration_seconds: None,
        total_duration_minutes: round_to(total_points * 8.5, 1),
        mode: mode.to_string(),
        polyline: "mock_polyline_data".to_string(),
        legs: Vec::new(),
        success: true,
        mock: true,
        note: Some("Enable Google Maps API for real route optimization".to_string()),
    }
}

fn mock_isochrone(
    center: Coordinates,
    duration_minutes: u32,
    mode: &str,
    intervals: &[u32],
) -> Isochrone {
    let max_interval = intervals.iter().copied().max().unwrap_or(0);
    let isochrones = intervals
        .iter()
        .map(|&interval| {
            let radius_deg = f64::from(interval) / 60.0 * 0.01;
            let mut polygon: Vec<[f64; 2]> = (0..MOCK_ISOCHRONE_VERTICES)
                .map(|i| {
                    let angle = 2.0 * PI / MOCK_ISOCHRONE_VERTICES as f64 * i as f64;
                    [
                        center.lng + radius_deg * angle.sin(),
                        center.lat + radius_deg * angle.cos(),
                    ]
                })
                .collect();
            polygon.push(polygon[0]);
            IsochroneRing {
                duration_minutes: interval,
                polygon,
                points_count: MOCK_ISOCHRONE_VERTICES,
                color: isochrone_color(interval, max_interval),
            }
        })
        .collect();

    Isochrone {
        center,
        mode: mode.to_string(),
        max_duration_minutes: duration_minutes,
        isochrones,
        success: true,
        mock: true,
        note: Some("Enable Google Maps API for accurate isochrone calculations".to_string()),
    }
}

fn mock_poi_name(poi_type: &str) -> String {
    match poi_type {
        "transit_station" => "Metro Station".to_string(),
        "hospital" => "General Hospital".to_string(),
        "school" => "Public School".to_string(),
        "supermarket" => "Supermarket".to_string(),
        "pharmacy" => "Pharmacy".to_string(),
        other => title_case(other),
    }
}

fn mock_accessibility(
    location: Coordinates,
    poi_types: &[String],
    max_duration_minutes: u32,
) -> Accessibility {
    let scores: BTreeMap<String, PoiAccess> = poi_types
        .iter()
        .enumerate()
        .map(|(i, poi_type)| {
            let duration = 5.0 + 3.0 * i as f64;
            (
                poi_type.clone(),
                PoiAccess {
                    name: mock_poi_name(poi_type),
                    duration_minutes: duration,
                    distance_meters: duration * 80.0,
                    score: round_to(access_score(duration, max_duration_minutes), 1),
                    location: Coordinates::new(location.lat + 0.005, location.lng + 0.005),
                    accessible: duration <= f64::from(max_duration_minutes),
                },
            )
        })
        .collect();
    let overall = mean(scores.values().map(|s| s.score));

    Accessibility {
        location,
        accessibility_scores: scores,
        overall_score: round_to(overall, 1),
        max_duration_minutes,
        success: true,
        mock: true,
        note: Some("Enable Google Maps API for real accessibility analysis".to_string()),
    }
}

fn mock_meeting_point(locations: &[Coordinates], centroid: Coordinates, mode: &str) -> MeetingPoint {
    MeetingPoint {
        participant_locations: locations.to_vec(),
        optimal_meeting_point: Some(MeetingVenue {
            name: Some("Central Café".to_string()),
            location: centroid,
            address: Some("Downtown Area".to_string()),
            rating: Some(4.5),
            total_travel_time_minutes: 25.0,
        }),
        mode: mode.to_string(),
        success: true,
        mock: true,
        note: Some("Enable Google Maps API for real meeting point optimization".to_string()),
    }
}
