//! Connection settings shared by every subcommand, and the pipeline built from them.

use anyhow::Result;
use clap::Args;
use geomind::{
    constants::DEFAULT_TEXT_MODEL,
    prompts::tasks::{
        QUERY_INTERPRETATION_SYSTEM_PROMPT, QUERY_INTERPRETATION_USER_PROMPT,
        SQL_GENERATION_SYSTEM_PROMPT, SQL_GENERATION_USER_PROMPT,
    },
    providers::{
        ai::AiProvider,
        db::postgis::{PostgisProvider, PostgisSettings},
        factory::{create_provider, ProviderSpec},
        maps::{google::GoogleMapsProvider, MapsProvider},
    },
    GeoExecutor, Interpreter, ResolvedTask, SqlGenerator,
};
use tracing::warn;

const TEXT_PROVIDER: &str = "gemini_text";

#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Gemini API key. Without it, queries are interpreted by keyword matching.
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    /// Google Maps API key. Without it, results are not enriched with nearby places.
    #[arg(long, global = true, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub maps_api_key: Option<String>,
    #[arg(long, global = true, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,
    #[arg(long, global = true, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,
    #[arg(long, global = true, env = "DB_NAME", default_value = "geospatial_ai")]
    pub db_name: String,
    #[arg(long, global = true, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,
    #[arg(
        long,
        global = true,
        env = "DB_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub db_password: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl ServiceArgs {
    pub fn postgis_settings(&self) -> PostgisSettings {
        PostgisSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            name: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            ..Default::default()
        }
    }

    pub fn storage(&self) -> PostgisProvider {
        PostgisProvider::new(self.postgis_settings())
    }

    /// The Gemini text model, or `None` when no key is configured.
    pub fn text_provider(&self) -> Result<Option<Box<dyn AiProvider>>> {
        let Some(api_key) = non_empty(&self.gemini_api_key) else {
            warn!("GEMINI_API_KEY not set. Using keyword interpretation and template SQL.");
            return Ok(None);
        };
        let provider_spec = ProviderSpec {
            provider_type: "gemini",
            model_name: DEFAULT_TEXT_MODEL,
            api_url: None,
            api_key: Some(api_key),
        };
        Ok(Some(create_provider(&provider_spec)?))
    }

    pub fn maps(&self) -> Result<Option<Box<dyn MapsProvider>>> {
        match non_empty(&self.maps_api_key) {
            Some(key) => Ok(Some(Box::new(GoogleMapsProvider::new(key.to_string())?))),
            None => {
                warn!("GOOGLE_MAPS_API_KEY not set. Results will not be enriched.");
                Ok(None)
            }
        }
    }

    /// Builds the full query pipeline from these settings.
    pub fn executor(&self) -> Result<GeoExecutor> {
        let provider = self.text_provider()?;
        let interpretation_task = ResolvedTask {
            provider: TEXT_PROVIDER.to_string(),
            system_prompt: QUERY_INTERPRETATION_SYSTEM_PROMPT.to_string(),
            user_prompt: QUERY_INTERPRETATION_USER_PROMPT.to_string(),
        };
        let sql_task = ResolvedTask {
            provider: TEXT_PROVIDER.to_string(),
            system_prompt: SQL_GENERATION_SYSTEM_PROMPT.to_string(),
            user_prompt: SQL_GENERATION_USER_PROMPT.to_string(),
        };
        Ok(GeoExecutor::new(
            Interpreter::new(provider.clone(), interpretation_task),
            SqlGenerator::new(provider, sql_task),
            Box::new(self.storage()),
            self.maps()?,
        ))
    }
}
