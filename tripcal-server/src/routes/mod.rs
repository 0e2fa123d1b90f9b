pub mod convert;
pub mod index;
pub mod sync;

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tripcal_core::TripCalError;
use tripcal_core::feed::{RequestTimeout, validate_url};
use url::Url;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error rendered as `{"error": ...}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = %self.message, "Request failed");
        }
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<TripCalError> for ApiError {
    fn from(err: TripCalError) -> Self {
        let status = match &err {
            TripCalError::MissingCredential => StatusCode::UNAUTHORIZED,
            e if e.is_input_error() => StatusCode::BAD_REQUEST,
            TripCalError::FeedTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            TripCalError::FeedStatus(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            TripCalError::IcsParse(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

/// Query parameters shared by the feed endpoints.
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub url: Option<String>,
    pub timeout: Option<String>,
}

impl FeedParams {
    /// Validate timeout first, then the url.
    pub fn validate(&self, default: RequestTimeout) -> Result<(Url, RequestTimeout), TripCalError> {
        let timeout = RequestTimeout::parse(self.timeout.as_deref(), default)?;
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                TripCalError::InvalidUrl("Missing required parameter: url".to_string())
            })?;
        let url = validate_url(raw)?;
        Ok((url, timeout))
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

/// Response for a handler that panicked
pub fn internal_error(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(url: Option<&str>, timeout: Option<&str>) -> FeedParams {
        FeedParams {
            url: url.map(str::to_string),
            timeout: timeout.map(str::to_string),
        }
    }

    #[test]
    fn test_timeout_is_checked_before_url() {
        let err = params(None, Some("abc"))
            .validate(RequestTimeout::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Timeout must be a valid integer");
    }

    #[test]
    fn test_missing_url() {
        for url in [None, Some(""), Some("  ")] {
            let err = params(url, None).validate(RequestTimeout::default()).unwrap_err();
            assert_eq!(err.to_string(), "Missing required parameter: url");
        }
    }

    #[test]
    fn test_status_mapping() {
        let status = |e: TripCalError| ApiError::from(e).status;

        assert_eq!(status(TripCalError::MissingCredential), StatusCode::UNAUTHORIZED);
        assert_eq!(status(TripCalError::FeedTimeout(5)), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(status(TripCalError::FeedStatus(404)), StatusCode::NOT_FOUND);
        assert_eq!(status(TripCalError::FeedStatus(1000)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(TripCalError::IcsParse("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(TripCalError::FeedRequest("refused".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
