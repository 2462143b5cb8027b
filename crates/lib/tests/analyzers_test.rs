//! # Analyzer Tests
//!
//! Imagery, review, routing, and photo analysis against mock model and maps
//! providers, plus the scenario and historical simulations.

mod common;

use crate::common::{
    png_bytes, registry_with, setup_tracing, FailingAiProvider, MockAiProvider, MockMapsProvider,
};
use geomind::{
    advanced::{simulate_scenario, PhotoAnalyzer, TimeTravelAnalyzer},
    prompts::vision::photo_prompt,
    providers::{ai::ImageData, maps::MapsProvider},
    registry::{COMPARATIVE_SUMMARY, PHOTO_ANALYSIS, SATELLITE_ANALYSIS, SENTIMENT_ANALYSIS},
    routing::{RoutingAnalyzer, RoutingOutcome},
    vision::VisionAnalyzer,
    Coordinates,
};
use serde_json::{json, Map, Value};

fn maps() -> Option<Box<dyn MapsProvider>> {
    Some(Box::new(MockMapsProvider::default()))
}

// --- Vision ---

#[tokio::test]
async fn test_satellite_analysis_uses_model_and_imagery() {
    setup_tracing();
    let provider = MockAiProvider::new(vec!["Dense commercial blocks.".to_string()]);
    let history = provider.call_history.clone();
    let mime_types = provider.image_mime_types.clone();
    let analyzer = VisionAnalyzer::new(
        registry_with(Box::new(provider), &[SATELLITE_ANALYSIS]),
        maps(),
    );

    let analysis = analyzer
        .analyze_satellite_image(-30.0346, -51.2177, 18, "commercial_potential")
        .await;

    assert!(analysis.success);
    assert!(!analysis.mock);
    assert_eq!(analysis.insights, "Dense commercial blocks.");
    assert_eq!(
        analysis.image_url,
        "http://maps.test/staticmap?center=-30.0346,-51.2177&zoom=18"
    );
    assert_eq!(*mime_types.read().unwrap(), vec!["image/png".to_string()]);
    assert!(history.read().unwrap()[0].1.contains("-30.0346"));
}

#[tokio::test]
async fn test_satellite_analysis_without_maps_is_mocked() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![]);
    let registry = registry_with(Box::new(provider), &[SATELLITE_ANALYSIS]);
    let analyzer = VisionAnalyzer::new(registry, None);

    let analysis = analyzer
        .analyze_satellite_image(-30.0, -51.0, 18, "commercial_potential")
        .await;
    assert!(analysis.mock);
    assert!(analysis.insights.contains("Commercial Potential Score"));
}

#[tokio::test]
async fn test_multiple_locations_are_capped_and_compared() {
    setup_tracing();
    let mut responses: Vec<String> = (1..=5).map(|i| format!("insight {i}")).collect();
    responses.push("Location 2 is the strongest.".to_string());
    let provider = MockAiProvider::new(responses);
    let history = provider.call_history.clone();
    let analyzer = VisionAnalyzer::new(
        registry_with(Box::new(provider), &[SATELLITE_ANALYSIS, COMPARATIVE_SUMMARY]),
        maps(),
    );

    let locations: Vec<Coordinates> = (0..7)
        .map(|i| Coordinates::new(-30.0 + f64::from(i) * 0.01, -51.2))
        .collect();
    let result = analyzer
        .analyze_multiple_locations(&locations, "anything")
        .await;

    assert!(result.success);
    assert_eq!(result.individual_analyses.len(), 5);
    assert!(result
        .individual_analyses
        .iter()
        .all(|a| a.analysis.analysis_type == "commercial_potential"));
    assert_eq!(result.comparative_summary, "Location 2 is the strongest.");

    let history = history.read().unwrap();
    let (_, summary_prompt) = history.last().unwrap();
    assert!(summary_prompt.contains("Location 1: insight 1"));
    assert!(summary_prompt.contains("Location 5: insight 5"));
}

#[tokio::test]
async fn test_single_location_gets_placeholder_summary() {
    setup_tracing();
    let analyzer = VisionAnalyzer::default();
    let result = analyzer
        .analyze_multiple_locations(&[Coordinates::new(-30.0, -51.0)], "commercial_potential")
        .await;
    assert_eq!(result.individual_analyses.len(), 1);
    assert_eq!(
        result.comparative_summary,
        "Comparative analysis available with Gemini API"
    );
}

#[tokio::test]
async fn test_sentiment_analysis_reports_model_answer_and_failure() {
    setup_tracing();
    let reviews = vec!["Great coffee".to_string(), "Slow service".to_string()];

    let provider = MockAiProvider::new(vec!["Mostly positive.".to_string()]);
    let registry = registry_with(Box::new(provider), &[SENTIMENT_ANALYSIS]);
    let analyzer = VisionAnalyzer::new(registry, None);
    let result = analyzer.analyze_sentiment_from_reviews(&reviews, "service").await;
    assert_eq!(result["sentiment_analysis"], "Mostly positive.");
    assert_eq!(result["review_count"], 2);
    assert_eq!(result["success"], true);

    let failing = VisionAnalyzer::new(
        registry_with(Box::new(FailingAiProvider), &[SENTIMENT_ANALYSIS]),
        None,
    );
    let result = failing.analyze_sentiment_from_reviews(&reviews, "service").await;
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("quota"));
}

// --- Routing ---

#[tokio::test]
async fn test_route_optimization_sums_legs() {
    setup_tracing();
    let analyzer = RoutingAnalyzer::new(maps());
    let outcome = analyzer
        .optimize_multi_point_route(
            Coordinates::new(-30.0, -51.2),
            Coordinates::new(-30.1, -51.1),
            &[Coordinates::new(-30.02, -51.18), Coordinates::new(-30.05, -51.15)],
            "driving",
        )
        .await;

    let RoutingOutcome::Done(route) = outcome else {
        panic!("expected a route");
    };
    assert_eq!(route.optimized_order, vec![1, 0]);
    assert_eq!(route.total_distance_meters, Some(4500.0));
    assert_eq!(route.total_distance_km, 4.5);
    assert_eq!(route.total_duration_minutes, 15.0);
    assert_eq!(route.legs.len(), 3);
    assert!(!route.mock);
}

#[tokio::test]
async fn test_isochrone_rings_are_sorted_and_closed() {
    setup_tracing();
    let analyzer = RoutingAnalyzer::new(maps());
    let isochrone = analyzer
        .calculate_isochrone(Coordinates::new(-30.0346, -51.2177), 15, "walking", None)
        .await;

    assert!(!isochrone.mock);
    let durations: Vec<u32> = isochrone
        .isochrones
        .iter()
        .map(|r| r.duration_minutes)
        .collect();
    assert_eq!(durations, vec![5, 10, 15]);
    for ring in &isochrone.isochrones {
        assert_eq!(ring.polygon.first(), ring.polygon.last());
        assert_eq!(ring.polygon.len(), ring.points_count + 1);
    }
    assert_eq!(isochrone.isochrones[2].color, "#ef4444");
}

#[tokio::test]
async fn test_accessibility_scores_each_poi_type() {
    setup_tracing();
    let analyzer = RoutingAnalyzer::new(maps());
    let result = analyzer
        .analyze_accessibility(
            Coordinates::new(-30.0346, -51.2177),
            Some(vec!["school".to_string(), "bank".to_string()]),
            15,
        )
        .await;

    assert!(!result.mock);
    let keys: Vec<&String> = result.accessibility_scores.keys().collect();
    assert_eq!(keys, vec!["bank", "school"]);
    let school = &result.accessibility_scores["school"];
    assert_eq!(school.name, "school 0");
    assert_eq!(school.duration_minutes, 5.0);
    assert_eq!(school.score, 6.7);
    assert!(school.accessible);
    assert_eq!(result.overall_score, 6.7);
}

#[tokio::test]
async fn test_meeting_point_requires_two_locations() {
    setup_tracing();
    let analyzer = RoutingAnalyzer::new(maps());

    let outcome = analyzer
        .find_optimal_meeting_point(&[Coordinates::new(-30.0, -51.0)], "walking")
        .await;
    assert!(matches!(outcome, RoutingOutcome::Failed { success: false, .. }));

    let outcome = analyzer
        .find_optimal_meeting_point(
            &[Coordinates::new(-30.0, -51.2), Coordinates::new(-30.02, -51.18)],
            "walking",
        )
        .await;
    let RoutingOutcome::Done(meeting) = outcome else {
        panic!("expected a meeting point");
    };
    let venue = meeting.optimal_meeting_point.unwrap();
    assert_eq!(venue.name.as_deref(), Some("cafe 0"));
    assert_eq!(venue.total_travel_time_minutes, 10.0);
}

// --- Photo ---

#[tokio::test]
async fn test_photo_analysis_extracts_fields_from_model_text() {
    setup_tracing();
    let text = "This appears to be Rua Padre Chagas in Porto Alegre.\n\
                A quiet, residential neighborhood, clearly high-end.\n\
                Property value around R$ 9,000 per m².";
    let provider = MockAiProvider::new(vec![text.to_string()]);
    let history = provider.call_history.clone();
    let mime_types = provider.image_mime_types.clone();
    let analyzer = PhotoAnalyzer::new(registry_with(Box::new(provider), &[PHOTO_ANALYSIS]));

    let encoded = ImageData::from_bytes(png_bytes()).unwrap().to_base64();
    let analysis = analyzer
        .analyze_uploaded_photo(&format!("data:image/png;base64,{encoded}"), "location")
        .await;

    assert!(!analysis.mock);
    assert_eq!(
        analysis.identified_location.as_deref(),
        Some("This appears to be Rua Padre Chagas in Porto Alegre.")
    );
    assert_eq!(analysis.city.as_deref(), Some("Porto Alegre"));
    assert_eq!(analysis.characteristics, vec!["residential", "high-end", "quiet"]);
    assert_eq!(analysis.confidence_score, 0.6);
    assert_eq!(analysis.full_analysis, text);
    assert_eq!(*mime_types.read().unwrap(), vec!["image/png".to_string()]);
    assert!(history.read().unwrap()[0].1.contains(photo_prompt("location")));
}

#[tokio::test]
async fn test_undecodable_photo_falls_back_to_mock() {
    setup_tracing();
    let provider = MockAiProvider::new(vec!["unused".to_string()]);
    let history = provider.call_history.clone();
    let analyzer = PhotoAnalyzer::new(registry_with(Box::new(provider), &[PHOTO_ANALYSIS]));

    let analysis = analyzer.analyze_uploaded_photo("not base64 at all!", "location").await;

    assert!(analysis.mock);
    assert!(history.read().unwrap().is_empty());
}

// --- Simulations ---

#[test]
fn test_what_if_scenarios_scale_with_parameters() {
    let mut params = Map::new();
    params.insert("growth_percentage".to_string(), json!(50));
    let growth = simulate_scenario(-30.0346, -51.2177, "population_increase", &params);

    assert_eq!(growth["scenario"], "Population Increase +50%");
    assert_eq!(growth["location"], json!({"lat": -30.0346, "lng": -51.2177}));
    let stress = &growth["impacts"]["infrastructure_stress"];
    assert_eq!(stress["schools"], "Need +5 new schools");
    assert_eq!(stress["hospitals"], "+50% patient load");
    assert_eq!(growth["impacts"]["real_estate"]["prices"], "+40% to +60%");

    let defaulted = simulate_scenario(0.0, 0.0, "population_increase", &Map::new());
    assert_eq!(defaulted["scenario"], "Population Increase +30%");

    let mut params = Map::new();
    params.insert("size".to_string(), json!("large"));
    let mall = simulate_scenario(0.0, 0.0, "new_shopping_mall", &params);
    assert_eq!(mall["scenario"], "New Shopping Mall (large)");
    assert_eq!(mall["mall_details"]["estimated_stores"], 144);
    assert_eq!(mall["impacts"]["traffic"]["increase"], "+63% on nearby roads");

    let generic = simulate_scenario(0.0, 0.0, "alien_landing", &Map::new());
    assert_eq!(generic["scenario"], "Generic Urban Change");
    assert_eq!(generic["success"], true);
}

#[test]
fn test_time_travel_with_custom_years() {
    let years = Some(vec![2000, 2012, 2018]);
    let mock = TimeTravelAnalyzer::new(false).get_historical_comparison(-30.0, -51.0, years.clone());

    assert_eq!(mock["years_analyzed"], json!([2000, 2012, 2018]));
    assert_eq!(mock["mock"], true);
    assert_eq!(mock["growth_rate"], json!(0.63));
    assert_eq!(mock["change_analysis"]["new_constructions"], "144 new buildings");
    assert_eq!(
        mock["key_changes"],
        json!([
            "2000: Predominantly residential area",
            "2012: First shopping center opened",
            "2018: Metro expansion completed"
        ])
    );
    let predictions: Vec<&String> = mock["predictions"].as_object().unwrap().keys().collect();
    assert_eq!(predictions, vec!["2023", "2028"]);

    let enabled = TimeTravelAnalyzer::new(true).get_historical_comparison(-30.0, -51.0, years);
    assert!(enabled.get("predictions").is_none());
    assert_eq!(enabled["growth_rate"], json!(0.54));
    let images: Vec<&Value> = enabled["images"].as_array().unwrap().iter().collect();
    assert_eq!(images.len(), 3);
    assert_eq!(images[2]["year"], 2018);
}
