//! # The Query Pipeline
//!
//! This module defines the `GeoExecutor`, the entry point for natural-language
//! geospatial queries. It holds the interpreter, the SQL generator, the spatial
//! storage, and the optional maps provider, and runs them in sequence:
//! interpret, generate SQL, execute, enrich, pick a visualization.

use crate::{
    enrich::enrich_with_places,
    interpreter::Interpreter,
    mock::mock_geospatial_rows,
    providers::{db::storage::SpatialStorage, maps::MapsProvider},
    sql::SqlGenerator,
    types::{GeneratedQuery, Interpretation, QueryResponse, ResultRow, VisualizationType},
};
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct GeoExecutor {
    pub interpreter: Interpreter,
    pub sql_generator: SqlGenerator,
    pub storage: Box<dyn SpatialStorage>,
    pub maps: Option<Box<dyn MapsProvider>>,
}

impl GeoExecutor {
    pub fn new(
        interpreter: Interpreter,
        sql_generator: SqlGenerator,
        storage: Box<dyn SpatialStorage>,
        maps: Option<Box<dyn MapsProvider>>,
    ) -> Self {
        Self {
            interpreter,
            sql_generator,
            storage,
            maps,
        }
    }

    /// Runs a query against storage, answering with the mock rows on any storage error.
    pub async fn execute_query(&self, query: &GeneratedQuery) -> Vec<ResultRow> {
        match self.storage.execute_query(query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    "{} query failed, serving mock data: {e}",
                    self.storage.name()
                );
                mock_geospatial_rows()
            }
        }
    }

    /// Runs the full pipeline for one natural-language query.
    ///
    /// The returned response always carries debug information (interpretation
    /// source, SQL source, bind parameters); callers drop it when not requested.
    pub async fn process_query(&self, query: &str, context: Option<&Value>) -> QueryResponse {
        info!("Executor received query: '{}'", query);

        let (interpretation, interpretation_source) =
            self.interpreter.interpret(query, context).await;
        let generated = self.sql_generator.generate(&interpretation).await;
        let mut results = self.execute_query(&generated).await;

        if interpretation.enrich_with_places {
            results =
                enrich_with_places(self.maps.as_deref(), results, &interpretation).await;
        }

        let visualization_type = determine_visualization_type(&interpretation, &results);

        let interpretation_json = match serde_json::to_string_pretty(&interpretation) {
            Ok(text) => text,
            Err(e) => return QueryResponse::failed(query, e.to_string()),
        };

        info!(
            "Query answered with {} rows as {:?}",
            results.len(),
            visualization_type
        );
        QueryResponse {
            query: query.to_string(),
            interpretation: interpretation_json,
            sql_query: generated.sql,
            results,
            visualization_type,
            success: true,
            error: None,
            debug: Some(json!({
                "interpretation_source": interpretation_source,
                "sql_source": generated.source,
                "sql_params": generated.params,
            })),
        }
    }
}

/// Chooses how a result set should be drawn.
pub fn determine_visualization_type(
    interpretation: &Interpretation,
    results: &[ResultRow],
) -> VisualizationType {
    if results.is_empty() {
        return VisualizationType::None;
    }
    let query_type = interpretation.query_type.to_lowercase();
    let analysis_type = interpretation.analysis_type.to_lowercase();

    if query_type.contains("heatmap") || analysis_type.contains("density") {
        VisualizationType::Heatmap
    } else if query_type.contains("polygon") || query_type.contains("area") {
        VisualizationType::Polygon
    } else if query_type.contains("route") || query_type.contains("path") {
        VisualizationType::Polyline
    } else {
        VisualizationType::Markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpretation(query_type: &str, analysis_type: &str) -> Interpretation {
        Interpretation {
            query_type: query_type.into(),
            analysis_type: analysis_type.into(),
            ..Default::default()
        }
    }

    #[test]
    fn visualization_rules() {
        let rows = mock_geospatial_rows();
        let cases = [
            ("heatmap", "proximity", VisualizationType::Heatmap),
            ("point", "Density", VisualizationType::Heatmap),
            ("polygon", "proximity", VisualizationType::Polygon),
            ("service_area", "", VisualizationType::Polygon),
            ("route", "", VisualizationType::Polyline),
            ("shortest_path", "", VisualizationType::Polyline),
            ("point", "clustering", VisualizationType::Markers),
        ];
        for (query_type, analysis_type, expected) in cases {
            assert_eq!(
                determine_visualization_type(&interpretation(query_type, analysis_type), &rows),
                expected,
                "{query_type}/{analysis_type}"
            );
        }
    }

    #[test]
    fn empty_results_have_no_visualization() {
        assert_eq!(
            determine_visualization_type(&interpretation("heatmap", "density"), &[]),
            VisualizationType::None
        );
    }
}
