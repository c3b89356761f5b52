use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TattooError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    RequestError(String),

    #[error("Invalid image: {0}")]
    ImageError(String),

    #[error("Gemini API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Model returned no image")]
    NoImage,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),
}

impl TattooError {
    pub fn image(msg: impl std::fmt::Display) -> Self {
        TattooError::ImageError(msg.to_string())
    }
}

impl From<image::ImageError> for TattooError {
    fn from(e: image::ImageError) -> Self {
        TattooError::ImageError(e.to_string())
    }
}

impl From<base64::DecodeError> for TattooError {
    fn from(e: base64::DecodeError) -> Self {
        TattooError::ImageError(format!("invalid base64: {}", e))
    }
}

impl ResponseError for TattooError {
    fn status_code(&self) -> StatusCode {
        match self {
            TattooError::RequestError(_) | TattooError::ImageError(_) => StatusCode::BAD_REQUEST,
            TattooError::NoImage | TattooError::ApiError { .. } | TattooError::NetworkError(_) => {
                StatusCode::BAD_GATEWAY
            }
            TattooError::ContentBlocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

pub type Result<T> = std::result::Result<T, TattooError>;
