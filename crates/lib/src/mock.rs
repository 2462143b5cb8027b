//! Demonstration rows served when the spatial database cannot answer.

use crate::{constants::PORTO_ALEGRE, types::ResultRow, util::round_to};
use serde_json::{json, Value};

/// Ten candidate areas on a 5×2 grid around Porto Alegre, best score first.
pub fn mock_geospatial_rows() -> Vec<ResultRow> {
    let mut rows: Vec<ResultRow> = (0..10)
        .map(|i: i32| {
            let lat = PORTO_ALEGRE.lat + f64::from(i % 5 - 2) * 0.01;
            let lng = PORTO_ALEGRE.lng + f64::from(i / 5 - 1) * 0.01;
            let fi = f64::from(i);
            let ring = json!([
                [lng - 0.005, lat - 0.005],
                [lng + 0.005, lat - 0.005],
                [lng + 0.005, lat + 0.005],
                [lng - 0.005, lat + 0.005],
                [lng - 0.005, lat - 0.005]
            ]);
            let row = json!({
                "id": i + 1,
                "name": format!("Area {}", i + 1),
                "score": round_to(85.0 - fi * 3.5, 1),
                "population": 5000 + i * 500,
                "density": round_to(120.0 - fi * 5.0, 1),
                "young_population_pct": round_to(35.0 + fi * 2.0, 1),
                "competitor_count": i % 3,
                "business_centers_nearby": 2 + i % 4,
                "avg_walk_time": round_to(5.0 + fi * 0.8, 1),
                "geometry": { "type": "Polygon", "coordinates": [ring] },
                "center": { "lat": lat, "lng": lng },
            });
            match row {
                Value::Object(map) => map,
                _ => ResultRow::new(),
            }
        })
        .collect();

    rows.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));
    rows
}

fn score_of(row: &ResultRow) -> f64 {
    row.get("score").and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_rows_sorted_by_score() {
        let rows = mock_geospatial_rows();
        assert_eq!(rows.len(), 10);
        let scores: Vec<f64> = rows.iter().map(score_of).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(scores[0], 85.0);
        assert_eq!(scores[9], 53.5);
    }

    #[test]
    fn rows_carry_closed_polygons_and_centers() {
        for row in mock_geospatial_rows() {
            let ring = row["geometry"]["coordinates"][0].as_array().unwrap();
            assert_eq!(ring.len(), 5);
            assert_eq!(ring[0], ring[4]);
            assert!(row["center"]["lat"].is_f64());
        }
        let first = &mock_geospatial_rows()[0];
        assert_eq!(first["name"], "Area 1");
        assert_eq!(first["center"]["lat"].as_f64().unwrap(), PORTO_ALEGRE.lat - 0.02);
    }
}
