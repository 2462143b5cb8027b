//! # Interpreter and SQL Generator Tests
//!
//! Exercises the model-backed paths of query interpretation and SQL generation, and
//! their fallbacks when the model misbehaves.

mod common;

use crate::common::{setup_tracing, FailingAiProvider, MockAiProvider};
use geomind::{
    interpreter::fallback_interpretation,
    prompts::tasks::{
        QUERY_INTERPRETATION_SYSTEM_PROMPT, QUERY_INTERPRETATION_USER_PROMPT,
        SQL_GENERATION_SYSTEM_PROMPT, SQL_GENERATION_USER_PROMPT,
    },
    types::{InterpretationSource, SqlSource},
    Interpreter, ResolvedTask, SqlGenerator,
};
use serde_json::json;

fn interpretation_task() -> ResolvedTask {
    ResolvedTask {
        provider: "mock".to_string(),
        system_prompt: QUERY_INTERPRETATION_SYSTEM_PROMPT.to_string(),
        user_prompt: QUERY_INTERPRETATION_USER_PROMPT.to_string(),
    }
}

fn sql_task() -> ResolvedTask {
    ResolvedTask {
        provider: "mock".to_string(),
        system_prompt: SQL_GENERATION_SYSTEM_PROMPT.to_string(),
        user_prompt: SQL_GENERATION_USER_PROMPT.to_string(),
    }
}

const MODEL_INTERPRETATION: &str = r#"```json
{
  "query_type": "heatmap",
  "analysis_type": "density",
  "location": {"city": "Porto Alegre"},
  "filters": [{"type": "demographic", "attribute": "age", "operator": "between", "value": [20, 35], "unit": "years"}],
  "spatial_operations": [],
  "output": {"fields": ["name", "density"], "limit": 20},
  "enrich_with_places": false,
  "description": "Young population density"
}
```"#;

#[tokio::test]
async fn test_model_interpretation_strips_fences_and_fills_prompt() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![MODEL_INTERPRETATION.to_string()]);
    let history = provider.call_history.clone();
    let interpreter = Interpreter::new(Some(Box::new(provider)), interpretation_task());

    let (interpretation, source) = interpreter
        .interpret("where do young people live in Porto Alegre?", None)
        .await;

    assert_eq!(source, InterpretationSource::Model);
    assert_eq!(interpretation.query_type, "heatmap");
    assert_eq!(interpretation.location.city.as_deref(), Some("Porto Alegre"));
    assert_eq!(interpretation.filters[0].value, json!([20, 35]));
    assert_eq!(interpretation.output.limit, 20);

    let history = history.read().unwrap();
    assert_eq!(history.len(), 1);
    let (system_prompt, user_prompt) = &history[0];
    assert_eq!(system_prompt, QUERY_INTERPRETATION_SYSTEM_PROMPT);
    assert!(user_prompt.contains("where do young people live in Porto Alegre?"));
    assert!(!user_prompt.contains("{query}"));
    assert!(!user_prompt.contains("{context}"));
}

#[tokio::test]
async fn test_context_is_serialized_into_prompt() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![MODEL_INTERPRETATION.to_string()]);
    let history = provider.call_history.clone();
    let interpreter = Interpreter::new(Some(Box::new(provider)), interpretation_task());

    let context = json!({"budget": "medium"});
    interpreter.interpret("gyms", Some(&context)).await;

    let history = history.read().unwrap();
    assert!(history[0].1.contains(r#"{"budget":"medium"}"#));
}

#[tokio::test]
async fn test_non_json_answer_falls_back_to_keywords() {
    setup_tracing();
    let provider = MockAiProvider::new(vec!["I think you want coffee shops.".to_string()]);
    let interpreter = Interpreter::new(Some(Box::new(provider)), interpretation_task());

    let query = "coffee shops near the university";
    let (interpretation, source) = interpreter.interpret(query, None).await;

    assert_eq!(source, InterpretationSource::Keyword);
    assert_eq!(interpretation, fallback_interpretation(query));
}

#[tokio::test]
async fn test_failing_model_falls_back_to_keywords() {
    setup_tracing();
    let interpreter = Interpreter::new(Some(Box::new(FailingAiProvider)), interpretation_task());
    let (interpretation, source) = interpreter.interpret("restaurants", None).await;
    assert_eq!(source, InterpretationSource::Keyword);
    assert!(interpretation.enrich_with_places);
}

#[tokio::test]
async fn test_model_sql_is_accepted_when_read_only() {
    setup_tracing();
    let sql = "```sql\nSELECT name, score FROM demographics ORDER BY score DESC LIMIT 10;\n```";
    let provider = MockAiProvider::new(vec![sql.to_string()]);
    let history = provider.call_history.clone();
    let generator = SqlGenerator::new(Some(Box::new(provider)), sql_task());

    let interpretation = fallback_interpretation("coffee in Porto Alegre");
    let generated = generator.generate(&interpretation).await;

    assert_eq!(generated.source, SqlSource::Model);
    assert_eq!(
        generated.sql,
        "SELECT name, score FROM demographics ORDER BY score DESC LIMIT 10;"
    );
    assert!(generated.params.is_empty());

    let history = history.read().unwrap();
    let (_, user_prompt) = &history[0];
    assert!(user_prompt.contains("\"query_type\": \"polygon\""));
    assert!(user_prompt.contains("points_of_interest"));
}

#[tokio::test]
async fn test_destructive_model_sql_is_replaced_by_template() {
    setup_tracing();
    let provider = MockAiProvider::new(vec!["DROP TABLE demographics;".to_string()]);
    let generator = SqlGenerator::new(Some(Box::new(provider)), sql_task());

    let interpretation = fallback_interpretation("coffee in Porto Alegre");
    let generated = generator.generate(&interpretation).await;

    assert_eq!(generated.source, SqlSource::Template);
    assert!(generated.sql.contains("$1"));
    assert_eq!(generated.params, vec!["Porto Alegre".to_string()]);
}
