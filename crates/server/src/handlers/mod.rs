//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `geomind-server`.
//! The handlers are split into logical sub-modules based on their functionality:
//! the query pipeline and service endpoints, imagery analysis, routing, and the
//! advanced analyzers.

pub mod advanced;
pub mod general;
pub mod routing;
pub mod vision;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use advanced::*;
pub use general::*;
pub use routing::*;
pub use vision::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState, types::DebugParams};
