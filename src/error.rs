use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A violated field rule. The display text is sent to the client verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must be 3-100 characters")]
    TitleLength,
    #[error("Description must be 10-500 characters")]
    DescriptionLength,
    #[error("Invalid priority")]
    InvalidPriority,
    #[error("Invalid status")]
    InvalidStatus,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request store lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid request")]
    MalformedInput,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::MalformedInput => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Store(err) => {
                tracing::error!(error = %err, "request store failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody::new(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::MalformedInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ValidationError::InvalidStatus).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::LockPoisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ApiError::from(ValidationError::DescriptionLength);
        assert_eq!(err.to_string(), "Description must be 10-500 characters");
    }
}
