//! # SQL Generation
//!
//! Produces a PostGIS query for an [`Interpretation`], either written by the model or
//! taken from a fixed template. Model-written SQL only leaves this module if it passes
//! [`validate_read_only`].

use crate::{
    errors::GeoError,
    providers::{
        ai::{strip_code_fences, AiProvider},
        db::postgis::sql::{fallback_query, SCHEMA_DESCRIPTION},
    },
    types::{GeneratedQuery, Interpretation, ResolvedTask, SqlSource},
};
use regex::Regex;
use tracing::{debug, info, warn};

const FORBIDDEN_KEYWORDS: &str =
    r"(?i)\b(INSERT|UPDATE|DELETE|DROP|ALTER|CREATE|TRUNCATE|GRANT|REVOKE|COPY|VACUUM)\b";
/// String literals and quoted identifiers, with doubled quotes as escapes.
const QUOTED: &str = r#"'(?:[^']|'')*'|"(?:[^"]|"")*""#;

#[derive(Clone, Debug)]
pub struct SqlGenerator {
    ai_provider: Option<Box<dyn AiProvider>>,
    task: ResolvedTask,
}

impl SqlGenerator {
    pub fn new(ai_provider: Option<Box<dyn AiProvider>>, task: ResolvedTask) -> Self {
        Self { ai_provider, task }
    }

    /// Generates a query for the interpretation. Never fails: any model error or
    /// rejected statement yields the template query.
    pub async fn generate(&self, interpretation: &Interpretation) -> GeneratedQuery {
        let Some(provider) = &self.ai_provider else {
            return template_query(interpretation);
        };

        match self.generate_with_model(provider.as_ref(), interpretation).await {
            Ok(sql) => GeneratedQuery {
                sql,
                params: Vec::new(),
                source: SqlSource::Model,
            },
            Err(e) => {
                warn!("SQL generation failed, using template query: {e}");
                template_query(interpretation)
            }
        }
    }

    async fn generate_with_model(
        &self,
        provider: &dyn AiProvider,
        interpretation: &Interpretation,
    ) -> Result<String, GeoError> {
        let interpretation_json = serde_json::to_string_pretty(interpretation)?;
        let user_prompt = self
            .task
            .user_prompt
            .replace("{interpretation}", &interpretation_json)
            .replace("{schema}", SCHEMA_DESCRIPTION);

        info!("Generating SQL with model.");
        let raw_response = provider
            .generate(&self.task.system_prompt, &user_prompt)
            .await?;
        debug!("<-- Query from AI: {}", raw_response);

        let sql = strip_code_fences(&raw_response)?;
        validate_read_only(&sql)?;
        Ok(sql)
    }
}

/// The fixed density query, with the interpretation's city as a bind parameter.
pub fn template_query(interpretation: &Interpretation) -> GeneratedQuery {
    let (sql, params) = fallback_query(interpretation.location.city.as_deref());
    GeneratedQuery {
        sql,
        params,
        source: SqlSource::Template,
    }
}

/// Accepts a single `SELECT` or `WITH` statement free of data-modifying and DDL keywords.
///
/// Quoted text is blanked before scanning, so `WHERE name = 'Drop Zone'` passes.
pub fn validate_read_only(sql: &str) -> Result<(), GeoError> {
    let unquoted = Regex::new(QUOTED)?.replace_all(sql, "''");
    let statement = unquoted.trim();
    let statement = statement.strip_suffix(';').unwrap_or(statement).trim_end();

    if statement.is_empty() {
        return Err(GeoError::UnsafeSql("empty statement".to_string()));
    }
    if statement.contains(';') {
        return Err(GeoError::UnsafeSql("multiple statements".to_string()));
    }

    let upper = statement.to_uppercase();
    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        return Err(GeoError::UnsafeSql(
            "statement must start with SELECT or WITH".to_string(),
        ));
    }

    let re = Regex::new(FORBIDDEN_KEYWORDS)?;
    if let Some(found) = re.find(statement) {
        return Err(GeoError::UnsafeSql(format!(
            "forbidden keyword '{}'",
            found.as_str().to_uppercase()
        )));
    }
    Ok(())
}
