use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let photo_body_limit = app_state.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/query", post(handlers::query_handler))
        .route("/sample-queries", get(handlers::sample_queries))
        .route("/enrich-data", post(handlers::enrich_data_handler))
        .route("/analyze/satellite", post(handlers::satellite_handler))
        .route("/analyze/streetview", post(handlers::street_view_handler))
        .route(
            "/analyze/compare-locations",
            post(handlers::compare_locations_handler),
        )
        .route("/analyze/sentiment", post(handlers::sentiment_handler))
        .route("/routing/optimize", post(handlers::optimize_route_handler))
        .route("/routing/isochrone", post(handlers::isochrone_handler))
        .route(
            "/routing/accessibility",
            post(handlers::accessibility_handler),
        )
        .route(
            "/routing/meeting-point",
            post(handlers::meeting_point_handler),
        )
        .route(
            "/advanced/photo-analysis",
            post(handlers::photo_analysis_handler).layer(DefaultBodyLimit::max(photo_body_limit)),
        )
        .route("/advanced/time-travel", post(handlers::time_travel_handler))
        .route("/advanced/what-if", post(handlers::what_if_handler))
        .route(
            "/advanced/compare-cities",
            post(handlers::compare_cities_handler),
        )
        .route("/advanced/features", get(handlers::advanced_features))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
