use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geomind::GeoError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors originating from the `geomind` library.
    Geo(GeoError),
    /// A request that is well-formed JSON but carries unusable values.
    BadRequest(String),
}

/// Conversion from `GeoError` to `AppError`.
impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        AppError::Geo(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Geo(err) => {
                // Log the original error for debugging purposes
                error!("GeoError: {:?}", err);
                match err {
                    GeoError::MissingAiProvider(_) | GeoError::MissingMapsProvider => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                    GeoError::AiRequest(_)
                    | GeoError::AiDeserialization(_)
                    | GeoError::AiApi(_)
                    | GeoError::MapsRequest(_)
                    | GeoError::MapsApi(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
                    GeoError::StorageQueryFailed(_) | GeoError::UnsafeSql(_) => {
                        (StatusCode::BAD_REQUEST, err.to_string())
                    }
                    other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
                }
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
