//! # Imagery and Review Analysis
//!
//! Satellite and street-level image analysis through a multimodal model, side-by-side
//! comparison of several locations, and sentiment analysis of review text. Each
//! operation answers with a mock payload when the model or the imagery source is not
//! available.

use crate::{
    errors::GeoError,
    prompts::vision::{satellite_prompt, street_view_prompt},
    providers::maps::MapsProvider,
    registry::{
        TaskRegistry, COMPARATIVE_SUMMARY, SATELLITE_ANALYSIS, SENTIMENT_ANALYSIS,
        STREET_VIEW_ANALYSIS,
    },
    types::Coordinates,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

const MAX_COMPARED_LOCATIONS: usize = 5;
const MAX_REVIEWS: usize = 10;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize)]
pub struct SatelliteAnalysis {
    pub location: Coordinates,
    pub analysis_type: String,
    pub insights: String,
    pub image_url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreetViewLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreetViewAnalysis {
    pub location: StreetViewLocation,
    pub analysis_focus: String,
    pub insights: String,
    pub image_url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationAnalysis {
    pub location: Coordinates,
    pub analysis: SatelliteAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiLocationAnalysis {
    pub individual_analyses: Vec<LocationAnalysis>,
    pub comparative_summary: String,
    pub success: bool,
}

#[derive(Clone, Debug, Default)]
pub struct VisionAnalyzer {
    registry: TaskRegistry,
    maps: Option<Box<dyn MapsProvider>>,
}

impl VisionAnalyzer {
    pub fn new(registry: TaskRegistry, maps: Option<Box<dyn MapsProvider>>) -> Self {
        Self { registry, maps }
    }

    /// Whether a vision model is configured.
    pub fn is_enabled(&self) -> bool {
        self.registry.is_enabled(SATELLITE_ANALYSIS)
    }

    fn maps(&self) -> Result<&dyn MapsProvider, GeoError> {
        self.maps.as_deref().ok_or(GeoError::MissingMapsProvider)
    }

    /// Analyzes the satellite image around a point.
    pub async fn analyze_satellite_image(
        &self,
        lat: f64,
        lng: f64,
        zoom: u8,
        analysis_type: &str,
    ) -> SatelliteAnalysis {
        let center = Coordinates::new(lat, lng);
        match self.satellite_with_model(center, zoom, analysis_type).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Satellite analysis unavailable, serving mock analysis: {e}");
                mock_satellite_analysis(center, analysis_type)
            }
        }
    }

    async fn satellite_with_model(
        &self,
        center: Coordinates,
        zoom: u8,
        analysis_type: &str,
    ) -> Result<SatelliteAnalysis, GeoError> {
        let (provider, task) = self
            .registry
            .resolve(SATELLITE_ANALYSIS)
            .ok_or_else(|| GeoError::MissingAiProvider(SATELLITE_ANALYSIS.to_string()))?;
        let maps = self.maps()?;

        let image_url = maps.satellite_image_url(center, zoom);
        let image = maps.fetch_image(&image_url).await?;
        let user_prompt = task.user_prompt.replace(
            "{analysis_prompt}",
            &satellite_prompt(analysis_type, center.lat, center.lng),
        );

        info!("Analyzing satellite image at {center} ({analysis_type})");
        let insights = provider
            .generate_with_image(&task.system_prompt, &user_prompt, &image)
            .await?;
        Ok(SatelliteAnalysis {
            location: center,
            analysis_type: analysis_type.to_string(),
            insights,
            image_url,
            success: true,
            mock: false,
        })
    }

    /// Analyzes the street-level image at a point, looking in `heading` degrees.
    pub async fn analyze_street_view(
        &self,
        lat: f64,
        lng: f64,
        heading: u16,
        analysis_focus: &str,
    ) -> StreetViewAnalysis {
        let location = Coordinates::new(lat, lng);
        match self
            .street_view_with_model(location, heading, analysis_focus)
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Street view analysis unavailable, serving mock analysis: {e}");
                mock_street_view_analysis(location, analysis_focus)
            }
        }
    }

    async fn street_view_with_model(
        &self,
        location: Coordinates,
        heading: u16,
        analysis_focus: &str,
    ) -> Result<StreetViewAnalysis, GeoError> {
        let (provider, task) = self
            .registry
            .resolve(STREET_VIEW_ANALYSIS)
            .ok_or_else(|| GeoError::MissingAiProvider(STREET_VIEW_ANALYSIS.to_string()))?;
        let maps = self.maps()?;

        let image_url = maps.street_view_url(location, heading);
        let image = maps.fetch_image(&image_url).await?;
        let user_prompt = task
            .user_prompt
            .replace("{analysis_prompt}", street_view_prompt(analysis_focus));

        info!("Analyzing street view at {location} ({analysis_focus})");
        let insights = provider
            .generate_with_image(&task.system_prompt, &user_prompt, &image)
            .await?;
        Ok(StreetViewAnalysis {
            location: StreetViewLocation {
                lat: location.lat,
                lng: location.lng,
                heading: Some(heading),
            },
            analysis_focus: analysis_focus.to_string(),
            insights,
            image_url,
            success: true,
            mock: false,
        })
    }

    /// Runs commercial-potential satellite analysis on up to five locations and
    /// compares them.
    ///
    /// `_analysis_type` is accepted for request compatibility; every location is
    /// analyzed for commercial potential.
    pub async fn analyze_multiple_locations(
        &self,
        locations: &[Coordinates],
        _analysis_type: &str,
    ) -> MultiLocationAnalysis {
        let mut individual_analyses = Vec::new();
        for location in locations.iter().take(MAX_COMPARED_LOCATIONS) {
            let analysis = self
                .analyze_satellite_image(location.lat, location.lng, 18, "commercial_potential")
                .await;
            individual_analyses.push(LocationAnalysis {
                location: *location,
                analysis,
            });
        }

        let comparative_summary = if self.is_enabled() && individual_analyses.len() > 1 {
            match self.comparative_summary(&individual_analyses).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!("Comparative summary failed: {e}");
                    "Comparative analysis in progress...".to_string()
                }
            }
        } else {
            "Comparative analysis available with Gemini API".to_string()
        };

        MultiLocationAnalysis {
            individual_analyses,
            comparative_summary,
            success: true,
        }
    }

    async fn comparative_summary(&self, results: &[LocationAnalysis]) -> Result<String, GeoError> {
        let (provider, task) = self
            .registry
            .resolve(COMPARATIVE_SUMMARY)
            .ok_or_else(|| GeoError::MissingAiProvider(COMPARATIVE_SUMMARY.to_string()))?;
        let analyses = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("Location {}: {}", i + 1, r.analysis.insights))
            .collect::<Vec<_>>()
            .join("\n");
        let user_prompt = task
            .user_prompt
            .replace("{count}", &results.len().to_string())
            .replace("{analyses}", &analyses);
        provider.generate(&task.system_prompt, &user_prompt).await
    }

    /// Summarizes the sentiment of review texts with respect to one aspect.
    ///
    /// Without a model or without reviews a fixed mock result is returned. A model
    /// failure is reported in the payload as `{error, success: false}`.
    pub async fn analyze_sentiment_from_reviews(&self, reviews: &[String], aspect: &str) -> Value {
        let resolved = self.registry.resolve(SENTIMENT_ANALYSIS);
        let (provider, task) = match resolved {
            Some(pair) if !reviews.is_empty() => pair,
            _ => return mock_sentiment(),
        };

        let sample = reviews
            .iter()
            .take(MAX_REVIEWS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        let user_prompt = task
            .user_prompt
            .replace("{aspect}", aspect)
            .replace("{reviews}", &sample);

        info!("Analyzing sentiment of {} reviews ({aspect})", reviews.len());
        match provider.generate(&task.system_prompt, &user_prompt).await {
            Ok(text) => json!({
                "sentiment_analysis": text,
                "review_count": reviews.len(),
                "success": true,
            }),
            Err(e) => {
                warn!("Sentiment analysis failed: {e}");
                json!({ "error": e.to_string(), "success": false })
            }
        }
    }
}

fn mock_satellite_analysis(center: Coordinates, analysis_type: &str) -> SatelliteAnalysis {
    let (lat, lng) = (center.lat, center.lng);
    SatelliteAnalysis {
        location: center,
        analysis_type: analysis_type.to_string(),
        insights: format!(
            "Mock Satellite Analysis for ({lat}, {lng}):

Commercial Potential Score: 7.5/10

Key Observations:
- High building density with mixed commercial-residential use
- Good street accessibility with main road access
- Moderate parking availability
- Active commercial zone with visible businesses
- Well-maintained infrastructure

Recommendations:
- Suitable for retail or food service business
- Consider corner location for maximum visibility
- Peak activity likely during business hours

Note: Enable Gemini API for AI-powered analysis"
        ),
        image_url: format!(
            "https://via.placeholder.com/640x640.png?text=Satellite+View+{lat},{lng}"
        ),
        success: true,
        mock: true,
    }
}

fn mock_street_view_analysis(location: Coordinates, focus: &str) -> StreetViewAnalysis {
    let (lat, lng) = (location.lat, location.lng);
    StreetViewAnalysis {
        location: StreetViewLocation {
            lat,
            lng,
            heading: None,
        },
        analysis_focus: focus.to_string(),
        insights: "Mock Street View Analysis:

Storefront Quality: 8/10

Observations:
- Well-maintained building facades
- Clear and professional signage
- Good pedestrian access with wide sidewalks
- Active street with multiple businesses
- Clean and safe appearance

Suitability: High - Excellent location for customer-facing business

Note: Enable Gemini API for AI-powered visual analysis"
            .to_string(),
        image_url: format!("https://via.placeholder.com/640x640.png?text=Street+View+{lat},{lng}"),
        success: true,
        mock: true,
    }
}

fn mock_sentiment() -> Value {
    json!({
        "sentiment_score": 0.7,
        "positive_aspects": ["location", "atmosphere"],
        "negative_aspects": ["service"],
        "summary": "Mock sentiment analysis",
        "mock": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_analyzer_serves_mocks() {
        let analyzer = VisionAnalyzer::default();
        assert!(!analyzer.is_enabled());

        let satellite = analyzer
            .analyze_satellite_image(-30.0, -51.2, 18, "green_space")
            .await;
        assert!(satellite.mock && satellite.success);
        assert_eq!(satellite.analysis_type, "green_space");

        let street = analyzer.analyze_street_view(-30.0, -51.2, 90, "safety").await;
        assert!(street.mock);
        assert_eq!(street.analysis_focus, "safety");

        let sentiment = analyzer
            .analyze_sentiment_from_reviews(&["Great coffee".to_string()], "overall")
            .await;
        assert_eq!(sentiment["sentiment_score"], json!(0.7));
    }

    #[tokio::test]
    async fn comparison_caps_at_five_locations() {
        let analyzer = VisionAnalyzer::default();
        let locations: Vec<Coordinates> =
            (0..7).map(|i| Coordinates::new(-30.0 + i as f64 * 0.01, -51.2)).collect();
        let result = analyzer
            .analyze_multiple_locations(&locations, "comparative")
            .await;
        assert_eq!(result.individual_analyses.len(), 5);
        assert_eq!(
            result.comparative_summary,
            "Comparative analysis available with Gemini API"
        );
    }
}
