//! # Task Registry
//!
//! Binds task names to their prompt templates and to the AI provider configured for
//! them. A task whose provider was not instantiated (for example, because its API key
//! is missing) resolves to `None`, and callers switch to their fallback behavior.

use crate::{providers::ai::AiProvider, types::ResolvedTask};
use std::{collections::HashMap, sync::Arc};

pub const QUERY_INTERPRETATION: &str = "query_interpretation";
pub const SQL_GENERATION: &str = "sql_generation";
pub const SATELLITE_ANALYSIS: &str = "satellite_analysis";
pub const STREET_VIEW_ANALYSIS: &str = "street_view_analysis";
pub const COMPARATIVE_SUMMARY: &str = "comparative_summary";
pub const SENTIMENT_ANALYSIS: &str = "sentiment_analysis";
pub const PHOTO_ANALYSIS: &str = "photo_analysis";

#[derive(Clone, Debug, Default)]
pub struct TaskRegistry {
    pub providers: Arc<HashMap<String, Box<dyn AiProvider>>>,
    pub tasks: Arc<HashMap<String, ResolvedTask>>,
}

impl TaskRegistry {
    pub fn new(
        providers: Arc<HashMap<String, Box<dyn AiProvider>>>,
        tasks: Arc<HashMap<String, ResolvedTask>>,
    ) -> Self {
        Self { providers, tasks }
    }

    pub fn task(&self, task_name: &str) -> Option<&ResolvedTask> {
        self.tasks.get(task_name)
    }

    /// The task's templates and its provider, if both are available.
    pub fn resolve(&self, task_name: &str) -> Option<(&dyn AiProvider, &ResolvedTask)> {
        let task = self.tasks.get(task_name)?;
        let provider = self.providers.get(&task.provider)?;
        Some((provider.as_ref(), task))
    }

    /// An owned handle on the task's provider.
    pub fn provider_for(&self, task_name: &str) -> Option<Box<dyn AiProvider>> {
        let task = self.tasks.get(task_name)?;
        self.providers.get(&task.provider).cloned()
    }

    pub fn is_enabled(&self, task_name: &str) -> bool {
        self.resolve(task_name).is_some()
    }
}
