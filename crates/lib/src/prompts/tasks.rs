//
//! # Default Task Prompts
//!
//! This module contains the default, hardcoded prompt templates for all standard application tasks.
//! These are loaded programmatically and can be overridden by `config.yml`.

// --- Query Interpretation ---
pub const QUERY_INTERPRETATION_SYSTEM_PROMPT: &str = r#"You are an expert in geospatial analysis and SQL. Analyze natural language queries and extract structured information that will be used to generate a PostGIS SQL query. Only return valid JSON, no other text."#;
pub const QUERY_INTERPRETATION_USER_PROMPT: &str = r#"User Query: "{query}"

Additional Context: {context}

Return a JSON object with the following structure:
{
    "query_type": "point|polygon|heatmap|route",
    "analysis_type": "density|proximity|clustering|intersection",
    "location": {
        "city": "city name if mentioned",
        "region": "region if mentioned",
        "coordinates": "coordinates if mentioned"
    },
    "filters": [
        {
            "type": "demographic|business|infrastructure|environmental",
            "attribute": "specific attribute like age, income, poi_type",
            "operator": "greater_than|less_than|equals|within_distance",
            "value": "the threshold value",
            "unit": "meters|minutes|years|count"
        }
    ],
    "spatial_operations": [
        {
            "operation": "buffer|intersection|union|within|distance",
            "parameters": {
                "radius": "500",
                "unit": "meters"
            }
        }
    ],
    "output": {
        "fields": ["list of fields to return"],
        "limit": 100,
        "order_by": "field to sort by"
    },
    "enrich_with_places": true|false,
    "description": "A clear description of what the query is asking for"
}

Only return valid JSON, no other text."#;

// --- SQL Generation ---
pub const SQL_GENERATION_SYSTEM_PROMPT: &str = r#"You are an expert in PostGIS and spatial SQL. Generate a single, read-only PostgreSQL/PostGIS query. Return ONLY the SQL query, no explanations or markdown formatting."#;
pub const SQL_GENERATION_USER_PROMPT: &str = r#"Generate a PostgreSQL/PostGIS query based on the following structured interpretation.

Interpretation:
{interpretation}

Available tables and schema:
{schema}

Use PostGIS spatial functions like:
- ST_DWithin(geom1, geom2, distance) for proximity
- ST_Buffer(geom, radius) for buffer zones
- ST_Intersects(geom1, geom2) for overlaps
- ST_Distance(geom1, geom2) for distance calculations
- ST_AsGeoJSON(geom) to return geometry as GeoJSON

Return ONLY the SQL query, no explanations or markdown formatting.
The query should return results with geometry as GeoJSON (aliased `geometry`) for easy mapping."#;

// --- Vision ---
pub const SATELLITE_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an urban analyst who reads satellite imagery to support business location decisions."#;
pub const STREET_VIEW_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an urban analyst who reads street-level imagery to assess storefronts, foot traffic, maintenance, and safety."#;
pub const PHOTO_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert in Brazilian cities who identifies places and property characteristics from photos."#;
/// Vision tasks receive a per-analysis-type instruction block through `{analysis_prompt}`.
pub const VISION_ANALYSIS_USER_PROMPT: &str = r#"{analysis_prompt}"#;

// --- Comparative Summary ---
pub const COMPARATIVE_SUMMARY_SYSTEM_PROMPT: &str = r#"You are a commercial real-estate advisor comparing candidate business locations."#;
pub const COMPARATIVE_SUMMARY_USER_PROMPT: &str = r#"Compare these {count} location analyses and provide:
1. Best location and why
2. Key differences between locations
3. Top recommendation

Analyses:
{analyses}"#;

// --- Review Sentiment ---
pub const SENTIMENT_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a customer-experience analyst who summarizes business reviews."#;
pub const SENTIMENT_ANALYSIS_USER_PROMPT: &str = r#"Analyze the sentiment of these business reviews focusing on {aspect}.
Provide:
1. Overall sentiment score (0-1)
2. Top 3 positive aspects
3. Top 3 negative aspects
4. Brief summary

Reviews:
{reviews}

Return as JSON format."#;
