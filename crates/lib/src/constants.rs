//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `geomind` workspace: the reference coordinates, search radii, and remote API
//! base URLs.

use crate::types::Coordinates;

/// Porto Alegre city center, the reference point for mock data.
pub const PORTO_ALEGRE: Coordinates = Coordinates {
    lat: -30.0346,
    lng: -51.2177,
};

/// The city name the keyword interpreter recognizes.
pub const DEFAULT_CITY: &str = "Porto Alegre";

/// Radius, in meters, of the nearby-places search used during enrichment.
pub const ENRICHMENT_RADIUS_M: u32 = 500;

/// Maximum number of nearby places attached to one result row.
pub const MAX_NEARBY_PLACES: usize = 5;

/// Radius, in meters, of the per-POI-type search in accessibility analysis.
pub const ACCESSIBILITY_RADIUS_M: u32 = 3_000;

/// Radius, in meters, of the venue search around a meeting-point centroid.
pub const MEETING_POINT_RADIUS_M: u32 = 2_000;

/// Maximum number of destinations per distance-matrix request.
pub const DISTANCE_MATRIX_BATCH: usize = 25;

/// Base URL of the Google Maps Platform web services.
pub const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default text model for query interpretation and SQL generation.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-pro";

/// Default multimodal model for imagery analysis.
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";
