use crate::{
    errors::GeoError,
    types::{GeneratedQuery, ResultRow},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a spatial storage backend.
///
/// This trait defines a common interface for health checks, read-only query
/// execution, and schema setup against a spatially-enabled database (e.g., PostGIS).
#[async_trait]
pub trait SpatialStorage: Send + Sync + DynClone + Debug {
    /// Returns the name of the storage provider (e.g., "PostGIS").
    fn name(&self) -> &str;

    /// Reports `healthy`, or `unhealthy: <reason>`.
    async fn check_connection(&self) -> String;

    /// Executes a query with its bind parameters and returns the rows as JSON objects.
    async fn execute_query(&self, query: &GeneratedQuery) -> Result<Vec<ResultRow>, GeoError>;

    /// Creates the spatial extension, the tables, and their spatial indexes.
    async fn initialize_schema(&self) -> Result<(), GeoError>;
}

dyn_clone::clone_trait_object!(SpatialStorage);
