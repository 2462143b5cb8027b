use crate::{
    constants::GOOGLE_MAPS_BASE_URL,
    errors::GeoError,
    providers::{
        ai::ImageData,
        maps::{DirectionsRequest, MapsProvider, Measure, Place, Route, RouteLeg},
    },
    types::Coordinates,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

// --- Google Maps web service response structures ---

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Deserialize, Debug)]
struct PlacesBody {
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Deserialize, Debug)]
struct PlaceResult {
    name: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    rating: Option<f64>,
    vicinity: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    location: Coordinates,
}

#[derive(Deserialize, Debug)]
struct DirectionsBody {
    #[serde(default)]
    routes: Vec<RouteResult>,
}

#[derive(Deserialize, Debug)]
struct RouteResult {
    #[serde(default)]
    waypoint_order: Vec<usize>,
    #[serde(default)]
    legs: Vec<LegResult>,
    overview_polyline: Option<Polyline>,
}

#[derive(Deserialize, Debug)]
struct Polyline {
    points: String,
}

#[derive(Deserialize, Debug)]
struct LegResult {
    start_location: Coordinates,
    end_location: Coordinates,
    distance: TextValue,
    duration: TextValue,
    #[serde(default)]
    steps: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct TextValue {
    text: String,
    value: f64,
}

#[derive(Deserialize, Debug)]
struct MatrixBody {
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Deserialize, Debug)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Deserialize, Debug)]
struct MatrixElement {
    status: String,
    duration: Option<TextValue>,
}

impl From<TextValue> for Measure {
    fn from(tv: TextValue) -> Self {
        Measure {
            text: tv.text,
            value: tv.value,
        }
    }
}

// --- Google Maps Provider implementation ---

/// A provider for the Google Maps Platform web services (Places, Directions,
/// Distance Matrix, Static Maps, Street View Static).
#[derive(Clone, Debug)]
pub struct GoogleMapsProvider {
    client: ReqwestClient,
    base_url: String,
    api_key: String,
}

impl GoogleMapsProvider {
    /// Creates a provider against the public Google endpoints.
    pub fn new(api_key: String) -> Result<Self, GeoError> {
        Self::with_base_url(api_key, GOOGLE_MAPS_BASE_URL.to_string())
    }

    /// Creates a provider against a custom base URL (e.g., a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, GeoError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(GeoError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, GeoError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(url = %url, "--> Sending request to Google Maps");
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(GeoError::MapsRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeoError::MapsApi(error_text));
        }

        let envelope: Envelope<T> = response.json().await.map_err(GeoError::MapsRequest)?;
        match envelope.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(envelope.body),
            status => Err(GeoError::MapsApi(match envelope.error_message {
                Some(message) => format!("{status}: {message}"),
                None => status.to_string(),
            })),
        }
    }
}

fn now_unix() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "now".to_string())
}

#[async_trait]
impl MapsProvider for GoogleMapsProvider {
    async fn places_nearby(
        &self,
        location: Coordinates,
        radius_m: u32,
        place_type: &str,
    ) -> Result<Vec<Place>, GeoError> {
        let body: PlacesBody = self
            .get_json(
                "place/nearbysearch/json",
                &[
                    ("location", location.to_string()),
                    ("radius", radius_m.to_string()),
                    ("type", place_type.to_string()),
                ],
            )
            .await?;
        Ok(body
            .results
            .into_iter()
            .map(|p| Place {
                name: p.name,
                types: p.types,
                rating: p.rating,
                vicinity: p.vicinity,
                location: p.geometry.map(|g| g.location),
            })
            .collect())
    }

    async fn directions(&self, request: &DirectionsRequest) -> Result<Vec<Route>, GeoError> {
        let mut params = vec![
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", request.mode.clone()),
            ("departure_time", now_unix()),
        ];
        if !request.waypoints.is_empty() {
            let mut waypoints: Vec<String> =
                request.waypoints.iter().map(|w| w.to_string()).collect();
            if request.optimize_waypoints {
                waypoints.insert(0, "optimize:true".to_string());
            }
            params.push(("waypoints", waypoints.join("|")));
        }

        let body: DirectionsBody = self.get_json("directions/json", &params).await?;
        Ok(body
            .routes
            .into_iter()
            .map(|r| Route {
                waypoint_order: r.waypoint_order,
                overview_polyline: r.overview_polyline.map(|p| p.points).unwrap_or_default(),
                legs: r
                    .legs
                    .into_iter()
                    .map(|leg| RouteLeg {
                        start_location: leg.start_location,
                        end_location: leg.end_location,
                        distance: leg.distance.into(),
                        duration: leg.duration.into(),
                        step_count: leg.steps.len(),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn distance_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
        mode: &str,
    ) -> Result<Vec<Option<f64>>, GeoError> {
        let destinations_param = destinations
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let body: MatrixBody = self
            .get_json(
                "distancematrix/json",
                &[
                    ("origins", origin.to_string()),
                    ("destinations", destinations_param),
                    ("mode", mode.to_string()),
                    ("departure_time", now_unix()),
                ],
            )
            .await?;

        let elements = body
            .rows
            .into_iter()
            .next()
            .map(|row| row.elements)
            .unwrap_or_default();
        Ok(elements
            .into_iter()
            .map(|e| match (e.status.as_str(), e.duration) {
                ("OK", Some(duration)) => Some(duration.value),
                _ => None,
            })
            .collect())
    }

    fn satellite_image_url(&self, center: Coordinates, zoom: u8) -> String {
        format!(
            "{}/staticmap?center={center}&zoom={zoom}&size=640x640&maptype=satellite",
            self.base_url
        )
    }

    fn street_view_url(&self, location: Coordinates, heading: u16) -> String {
        format!(
            "{}/streetview?size=640x640&location={location}&heading={heading}&pitch=0&fov=90",
            self.base_url
        )
    }

    async fn fetch_image(&self, url: &str) -> Result<ImageData, GeoError> {
        debug!(url = %url, "--> Downloading map image");
        let response = self
            .client
            .get(url)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(GeoError::MapsRequest)?;
        if !response.status().is_success() {
            return Err(GeoError::MapsApi(format!(
                "image download failed with status {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await.map_err(GeoError::MapsRequest)?;
        ImageData::from_bytes(bytes.to_vec())
    }
}
