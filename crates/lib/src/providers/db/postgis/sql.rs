//! # PostGIS Specific SQL
//!
//! This module centralizes SQL strings for the PostGIS provider: the schema DDL,
//! the schema description handed to the model, and the fallback analysis query.

/// Statements run in order by `initialize_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS postgis;",
    "CREATE TABLE IF NOT EXISTS demographics (
        id SERIAL PRIMARY KEY,
        geom GEOMETRY(Polygon, 4326),
        city VARCHAR(100),
        neighborhood VARCHAR(100),
        population INTEGER,
        age_group VARCHAR(50),
        income_level VARCHAR(50),
        density FLOAT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );",
    "CREATE TABLE IF NOT EXISTS points_of_interest (
        id SERIAL PRIMARY KEY,
        geom GEOMETRY(Point, 4326),
        name VARCHAR(200),
        type VARCHAR(100),
        category VARCHAR(100),
        rating FLOAT,
        review_count INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );",
    "CREATE TABLE IF NOT EXISTS business_zones (
        id SERIAL PRIMARY KEY,
        geom GEOMETRY(Polygon, 4326),
        name VARCHAR(200),
        zone_type VARCHAR(100),
        avg_foot_traffic INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );",
    "CREATE TABLE IF NOT EXISTS infrastructure (
        id SERIAL PRIMARY KEY,
        geom GEOMETRY(Geometry, 4326),
        type VARCHAR(100),
        name VARCHAR(200),
        capacity INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );",
    "CREATE INDEX IF NOT EXISTS idx_demographics_geom ON demographics USING GIST(geom);",
    "CREATE INDEX IF NOT EXISTS idx_poi_geom ON points_of_interest USING GIST(geom);",
    "CREATE INDEX IF NOT EXISTS idx_business_geom ON business_zones USING GIST(geom);",
    "CREATE INDEX IF NOT EXISTS idx_infrastructure_geom ON infrastructure USING GIST(geom);",
];

/// The table layout as described to the SQL-writing model.
pub const SCHEMA_DESCRIPTION: &str = "\
- demographics: id, geom (geometry), city, neighborhood, population, age_group, income_level, density
- points_of_interest: id, geom (geometry), name, type, category, rating, review_count
- business_zones: id, geom (geometry), name, zone_type, avg_foot_traffic
- infrastructure: id, geom (geometry), type, name, capacity";

/// Returns the fallback density query and its bind parameters.
///
/// Neighborhoods are joined to points of interest within 500 units of distance,
/// ordered by density, and capped at 50 rows. When a city is given it is bound as
/// `$1`.
pub fn fallback_query(city: Option<&str>) -> (String, Vec<String>) {
    let (city_filter, params) = match city {
        Some(city) => ("WHERE d.city = $1", vec![city.to_string()]),
        None => ("", Vec::new()),
    };
    let sql = format!(
        "SELECT
    d.id,
    d.neighborhood AS name,
    d.population,
    d.density,
    ST_AsGeoJSON(d.geom) AS geometry,
    COUNT(poi.id) AS nearby_pois
FROM demographics d
LEFT JOIN points_of_interest poi
    ON ST_DWithin(d.geom, poi.geom, 500)
{city_filter}
GROUP BY d.id, d.neighborhood, d.population, d.density, d.geom
ORDER BY d.density DESC
LIMIT 50;"
    );
    (sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_is_bound_not_interpolated() {
        let (sql, params) = fallback_query(Some("Porto Alegre'; DROP TABLE x; --"));
        assert!(sql.contains("WHERE d.city = $1"));
        assert!(!sql.contains("DROP"));
        assert_eq!(params, vec!["Porto Alegre'; DROP TABLE x; --".to_string()]);
    }

    #[test]
    fn no_city_means_no_filter() {
        let (sql, params) = fallback_query(None);
        assert!(!sql.contains("WHERE"));
        assert!(params.is_empty());
        assert!(sql.contains("ORDER BY d.density DESC"));
        assert!(sql.contains("LIMIT 50"));
    }
}
