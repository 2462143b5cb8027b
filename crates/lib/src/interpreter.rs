//! # Query Interpreter
//!
//! Turns a natural-language geospatial question into a structured [`Interpretation`].
//! When a language model is configured it is asked for the JSON structure; when it is
//! missing, fails, or answers with something that is not JSON, a keyword scan of the
//! query produces the interpretation instead.

use crate::{
    constants::DEFAULT_CITY,
    errors::GeoError,
    providers::ai::{strip_code_fences, AiProvider},
    types::{
        Filter, Interpretation, InterpretationSource, Location, OutputSpec, ResolvedTask,
        SpatialOperation,
    },
};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct Interpreter {
    ai_provider: Option<Box<dyn AiProvider>>,
    task: ResolvedTask,
}

impl Interpreter {
    /// Creates an interpreter. `task` supplies the prompt templates used with the model.
    pub fn new(ai_provider: Option<Box<dyn AiProvider>>, task: ResolvedTask) -> Self {
        Self { ai_provider, task }
    }

    pub fn is_enabled(&self) -> bool {
        self.ai_provider.is_some()
    }

    /// Interprets a query, reporting whether the model or the keyword scan produced it.
    pub async fn interpret(
        &self,
        query: &str,
        context: Option<&Value>,
    ) -> (Interpretation, InterpretationSource) {
        let Some(provider) = &self.ai_provider else {
            return (fallback_interpretation(query), InterpretationSource::Keyword);
        };

        match self.interpret_with_model(provider.as_ref(), query, context).await {
            Ok(interpretation) => (interpretation, InterpretationSource::Model),
            Err(e) => {
                warn!("Query interpretation failed, using keyword fallback: {e}");
                (fallback_interpretation(query), InterpretationSource::Keyword)
            }
        }
    }

    async fn interpret_with_model(
        &self,
        provider: &dyn AiProvider,
        query: &str,
        context: Option<&Value>,
    ) -> Result<Interpretation, GeoError> {
        let context_text = match context {
            Some(ctx) if !is_empty_context(ctx) => serde_json::to_string(ctx)?,
            _ => "None".to_string(),
        };
        let user_prompt = self
            .task
            .user_prompt
            .replace("{query}", query)
            .replace("{context}", &context_text);

        info!("Interpreting query with model: '{}'", query);
        let raw_response = provider
            .generate(&self.task.system_prompt, &user_prompt)
            .await?;
        debug!("<-- Interpretation from AI: {}", raw_response);

        let cleaned = strip_code_fences(&raw_response)?;
        Ok(serde_json::from_str(&cleaned)?)
    }
}

fn is_empty_context(ctx: &Value) -> bool {
    match ctx {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Keyword-based interpretation of a query. Pure and deterministic.
pub fn fallback_interpretation(query: &str) -> Interpretation {
    let lower = query.to_lowercase();

    let mut spatial_operations = Vec::new();
    if query.contains("500") && (lower.contains("meter") || lower.contains("metro")) {
        let mut parameters = Map::new();
        parameters.insert("radius".to_string(), json!("500"));
        parameters.insert("unit".to_string(), json!("meters"));
        spatial_operations.push(SpatialOperation {
            operation: "buffer".to_string(),
            parameters,
        });
    }

    let mut filters = Vec::new();
    if lower.contains("coffee") || lower.contains("cafeteria") {
        filters.push(Filter {
            kind: "business".to_string(),
            attribute: "poi_type".to_string(),
            operator: "equals".to_string(),
            value: json!("cafe"),
            unit: "category".to_string(),
        });
    }

    Interpretation {
        query_type: "polygon".to_string(),
        analysis_type: "proximity".to_string(),
        location: Location {
            city: lower
                .contains("porto alegre")
                .then(|| DEFAULT_CITY.to_string()),
            ..Default::default()
        },
        filters,
        spatial_operations,
        output: OutputSpec {
            fields: vec!["name".into(), "score".into(), "geometry".into()],
            limit: 50,
            order_by: None,
        },
        enrich_with_places: lower.contains("coffee") || lower.contains("restaurant"),
        description: format!("Analysis query: {query}"),
    }
}
