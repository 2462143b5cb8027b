//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the query pipeline and every
//! analyzer, each wired to whichever AI, maps, and database providers the
//! configuration makes available.

use crate::config::AppConfig;
use geomind::{
    advanced::{PhotoAnalyzer, TimeTravelAnalyzer},
    constants::GOOGLE_MAPS_BASE_URL,
    providers::{
        ai::AiProvider,
        db::postgis::PostgisProvider,
        factory::{create_provider, ProviderSpec},
        maps::{google::GoogleMapsProvider, MapsProvider},
    },
    registry::{QUERY_INTERPRETATION, SQL_GENERATION},
    routing::RoutingAnalyzer,
    vision::VisionAnalyzer,
    GeoError, GeoExecutor, Interpreter, ResolvedTask, SqlGenerator, TaskRegistry,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The natural-language query pipeline, including storage.
    pub executor: Arc<GeoExecutor>,
    pub vision: VisionAnalyzer,
    pub routing: RoutingAnalyzer,
    pub photo: PhotoAnalyzer,
    pub time_travel: TimeTravelAnalyzer,
    /// The maps provider, if a key was configured.
    pub maps: Option<Box<dyn MapsProvider>>,
}

/// Builds the shared application state from the configuration.
///
/// - It instantiates an AI provider client for each entry in the `providers`
///   section. Providers missing a key or URL are skipped with a warning, and the
///   tasks bound to them fall back to heuristics and mock data.
/// - It resolves every task's prompts into a `TaskRegistry`.
/// - It prepares a lazily-connecting PostGIS provider.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set. Model-backed analysis will use fallbacks.");
    }

    // Create a map of AI provider instances from the configuration.
    let mut ai_providers: HashMap<String, Box<dyn AiProvider>> = HashMap::new();
    for (name, provider_config) in &config.providers {
        let provider_spec = ProviderSpec {
            provider_type: &provider_config.provider,
            model_name: &provider_config.model_name,
            api_url: provider_config.api_url.as_deref(),
            api_key: provider_config.api_key.as_deref(),
        };
        match create_provider(&provider_spec) {
            Ok(provider) => {
                ai_providers.insert(name.clone(), provider);
            }
            Err(GeoError::MissingAiProvider(reason)) => {
                warn!(provider = %name, "Skipping AI provider: {reason}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Validate and resolve all tasks from the configuration.
    let mut resolved_tasks = HashMap::new();
    for (name, task_config) in &config.tasks {
        let provider = task_config.provider.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'provider' field")
        })?;
        let system_prompt = task_config.system_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'system_prompt' field")
        })?;
        let user_prompt = task_config.user_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'user_prompt' field")
        })?;

        resolved_tasks.insert(
            name.clone(),
            ResolvedTask {
                provider,
                system_prompt,
                user_prompt,
            },
        );
    }
    let registry = TaskRegistry::new(Arc::new(ai_providers), Arc::new(resolved_tasks));

    let maps: Option<Box<dyn MapsProvider>> = match &config.maps.api_key {
        Some(key) => {
            let base_url = config
                .maps
                .base_url
                .clone()
                .unwrap_or_else(|| GOOGLE_MAPS_BASE_URL.to_string());
            Some(Box::new(GoogleMapsProvider::with_base_url(
                key.clone(),
                base_url,
            )?))
        }
        None => {
            warn!("GOOGLE_MAPS_API_KEY not set. Maps features will use mock data.");
            None
        }
    };

    let storage = PostgisProvider::new(config.db.clone());
    info!(
        host = %config.db.host,
        port = config.db.port,
        database = %config.db.name,
        "Initialized spatial storage provider (PostGIS)."
    );

    let executor = GeoExecutor::new(
        Interpreter::new(
            registry.provider_for(QUERY_INTERPRETATION),
            registry.task(QUERY_INTERPRETATION).cloned().unwrap_or_default(),
        ),
        SqlGenerator::new(
            registry.provider_for(SQL_GENERATION),
            registry.task(SQL_GENERATION).cloned().unwrap_or_default(),
        ),
        Box::new(storage),
        maps.clone(),
    );

    Ok(AppState {
        executor: Arc::new(executor),
        vision: VisionAnalyzer::new(registry.clone(), maps.clone()),
        routing: RoutingAnalyzer::new(maps.clone()),
        photo: PhotoAnalyzer::new(registry),
        time_travel: TimeTravelAnalyzer::new(maps.is_some()),
        maps,
        config: Arc::new(config),
    })
}
