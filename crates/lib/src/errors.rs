use thiserror::Error;

/// Custom error types for the library.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider is not configured for task '{0}'")]
    MissingAiProvider(String),
    #[error("Failed to send request to Maps API: {0}")]
    MapsRequest(reqwest::Error),
    #[error("Maps API returned an error: {0}")]
    MapsApi(String),
    #[error("Maps API is not configured")]
    MissingMapsProvider,
    #[error("Storage provider connection error: {0}")]
    StorageConnection(String),
    #[error("Storage query execution failed: {0}")]
    StorageQueryFailed(String),
    #[error("Generated SQL was rejected: {0}")]
    UnsafeSql(String),
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),
    #[error("JSON error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<base64::DecodeError> for GeoError {
    fn from(err: base64::DecodeError) -> Self {
        GeoError::ImageDecode(err.to_string())
    }
}

impl From<sqlx::Error> for GeoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => GeoError::StorageConnection(err.to_string()),
            _ => GeoError::StorageQueryFailed(err.to_string()),
        }
    }
}
