use analyzer::AnalyzerError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to read the upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every failure is answered as `{ "success": false, "error": ... }`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Multipart(multipart_err) => {
                tracing::warn!(error = %multipart_err, "Unreadable multipart upload.");
                (multipart_err.status(), multipart_err.body_text())
            }
            AppError::Analyzer(analyzer_err) => match analyzer_err {
                AnalyzerError::InvalidRequest(_)
                | AnalyzerError::Ingestion(_)
                | AnalyzerError::Evaluation(_) => {
                    (StatusCode::BAD_REQUEST, analyzer_err.to_string())
                }
                AnalyzerError::Policy(_) | AnalyzerError::Risk(_) => {
                    tracing::error!(error = ?analyzer_err, "Analyzer configuration error.");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "A server configuration error occurred".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}
