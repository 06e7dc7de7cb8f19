use crate::quote::SelectionError;
use crate::render::RenderError;
use crate::services::pdf::PdfError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Solicitud inválida: {0}")]
    FormValidation(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("No hay contenido para generar: {0}")]
    MissingContent(String),

    #[error("Tiempo de espera agotado: {0}")]
    Timeout(String),

    #[error("Error de plantilla: {0}")]
    Template(String),

    #[error("Error del motor de renderizado: {0}")]
    RenderEngine(String),

    #[error("Error del servidor: {0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FormValidation,
    NotFound,
    MissingContent,
    Timeout,
    Template,
    RenderEngine,
    InternalServerError,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub request_id: Option<String>,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            ApiError::FormValidation(_) => ErrorCode::FormValidation,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::MissingContent(_) => ErrorCode::MissingContent,
            ApiError::Timeout(_) => ErrorCode::Timeout,
            ApiError::Template(_) => ErrorCode::Template,
            ApiError::RenderEngine(_) => ErrorCode::RenderEngine,
            ApiError::InternalServerError(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::FormValidation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingContent(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RenderEngine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.to_error_code();
        let message = self.to_string();

        let error_response = ErrorResponse {
            request_id: None,
            error: ErrorDetail {
                code,
                message,
                details: None,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            _ => ApiError::RenderEngine(err.to_string()),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Template(err.to_string())
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pdf::RenderStage;

    #[test]
    fn test_pdf_errors_map_to_server_errors() {
        let launch: ApiError = PdfError::Launch("spawn failed".to_string()).into();
        assert_eq!(launch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout: ApiError = PdfError::Timeout {
            stage: RenderStage::Load,
            limit_ms: 30_000,
        }
        .into();
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert!(timeout.to_string().contains("load"));
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let err: ApiError = SelectionError::UnknownCode("X0".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("X0"));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::MissingContent).unwrap();
        assert_eq!(json, "\"MISSING_CONTENT\"");
    }
}
