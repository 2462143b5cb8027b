use serde::Deserialize;

/// The `?debug=true` query flag accepted by the query endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}
