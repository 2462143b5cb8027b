//! # GeoMind
//!
//! Natural-language geospatial analysis. A question such as "best places to open a
//! coffee shop in Porto Alegre" is interpreted by a language model (or a keyword
//! scan), turned into a read-only PostGIS query, executed against spatial storage
//! (or answered with demonstration rows), and enriched with nearby businesses from
//! a maps platform.
//!
//! Alongside the query pipeline the crate offers imagery and review analysis
//! ([`vision`]), route and reachability analysis ([`routing`]), and the analyzers in
//! [`advanced`]: photo identification, historical comparison, scenario simulation,
//! and multi-city comparison.

pub mod advanced;
pub mod constants;
pub mod enrich;
pub mod errors;
pub mod executor;
pub mod interpreter;
pub mod mock;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod routing;
pub mod sql;
pub mod types;
pub mod util;
pub mod vision;

pub use errors::GeoError;
pub use executor::GeoExecutor;
pub use interpreter::Interpreter;
pub use registry::TaskRegistry;
pub use sql::SqlGenerator;
pub use types::{
    Coordinates, GeneratedQuery, Interpretation, QueryResponse, ResolvedTask, ResultRow,
    VisualizationType,
};
