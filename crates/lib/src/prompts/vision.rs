//! # Imagery Analysis Prompts
//!
//! Per-analysis-type instruction blocks for satellite, street-level, and
//! uploaded-photo analysis. Unknown analysis types fall back to the first entry
//! of each family.

/// Instruction block for a satellite image at `(lat, lng)`.
///
/// Known types: `commercial_potential` (default), `infrastructure`, `green_space`, `development`.
pub fn satellite_prompt(analysis_type: &str, lat: f64, lng: f64) -> String {
    match analysis_type {
        "infrastructure" => format!(
            "Analyze the infrastructure in this satellite image at ({lat}, {lng}).

Identify:
1. Road network quality
2. Public transportation access points
3. Building conditions
4. Parking availability
5. Pedestrian infrastructure

Rate infrastructure quality: Poor/Fair/Good/Excellent"
        ),
        "green_space" => format!(
            "Analyze green spaces and environmental factors at ({lat}, {lng}).

Evaluate:
1. Parks and green areas
2. Tree coverage
3. Urban density vs nature balance
4. Recreational spaces
5. Environmental quality indicators"
        ),
        "development" => format!(
            "Analyze development and growth indicators at ({lat}, {lng}).

Look for:
1. New construction
2. Vacant lots
3. Mixed-use development
4. Signs of gentrification or decline
5. Investment potential (score 0-10)"
        ),
        _ => format!(
            "Analyze this satellite image of location ({lat}, {lng}) for commercial business potential.

Please evaluate:
1. Building density and types
2. Street accessibility and parking
3. Proximity to main roads and intersections
4. Green spaces and urban layout
5. Signs of commercial activity
6. Overall suitability for retail/commercial business (score 0-10)

Provide actionable insights for business location decisions."
        ),
    }
}

/// Instruction block for a street-level image.
///
/// Known focuses: `storefront_quality` (default), `foot_traffic`, `maintenance`, `safety`.
pub fn street_view_prompt(focus: &str) -> &'static str {
    match focus {
        "foot_traffic" => {
            "Analyze this street view for pedestrian activity indicators.

Look for:
1. Sidewalk width and condition
2. Pedestrian infrastructure (benches, crosswalks)
3. Business types that attract foot traffic
4. Estimated foot traffic level: Low/Medium/High
5. Peak hours indicators"
        }
        "maintenance" => {
            "Assess the maintenance and upkeep of this area.

Check:
1. Building exterior condition
2. Street cleanliness
3. Graffiti or vandalism
4. General maintenance level
5. Investment in area: Low/Medium/High"
        }
        "safety" => {
            "Evaluate safety and security indicators.

Observe:
1. Lighting infrastructure
2. Security cameras visible
3. Business activity levels
4. Overall safety perception
5. Recommended safety improvements"
        }
        _ => {
            "Analyze this street view image for storefront and business quality.

Evaluate:
1. Condition and maintenance of buildings
2. Storefront appeal and visibility
3. Signage quality
4. Overall aesthetic appeal (score 0-10)
5. Suitability for a new business

Provide specific observations and recommendations."
        }
    }
}

/// Instruction block for an uploaded photo.
///
/// Known types: `location` (default), `property_value`, `similar_places`, `urban_features`.
pub fn photo_prompt(analysis_type: &str) -> &'static str {
    match analysis_type {
        "property_value" => {
            "Analyze this property image and estimate:
1. Type of property (house, apartment, commercial)
2. Condition and maintenance level
3. Approximate size and features visible
4. Neighborhood quality indicators
5. Estimated market value range (in R$)
6. Factors affecting value (positive and negative)
7. Investment potential score (0-10)

Be specific about what you observe in the image."
        }
        "similar_places" => {
            "Analyze this location and suggest:
1. What type of place this is
2. Key characteristics
3. 5 similar places in other Brazilian cities
4. Why these places are similar
5. Comparison of advantages/disadvantages

Focus on urban characteristics and atmosphere."
        }
        "urban_features" => {
            "Analyze urban features in this image:
1. Infrastructure quality (roads, sidewalks, lighting)
2. Green spaces and trees
3. Commercial activity level
4. Public transportation visible
5. Pedestrian-friendliness score (0-10)
6. Overall urban planning quality
7. Recommendations for improvement"
        }
        _ => {
            "Analyze this photo and identify:
1. What city and neighborhood this appears to be (if identifiable)
2. Type of area (commercial, residential, industrial, mixed)
3. Notable landmarks or characteristics
4. Street type and urban density
5. Economic level indicators (low/medium/high income area)
6. Estimated property value range (if buildings visible)
7. Similar neighborhoods in Brazil

Provide detailed analysis with confidence level for location identification."
        }
    }
}
