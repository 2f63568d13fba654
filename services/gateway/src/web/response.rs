//! services/gateway/src/web/response.rs
//!
//! The JSON envelope shared by every endpoint: `{"data": ...}` on success and
//! `{"message": ...}` on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::PortError;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Wraps a successful result in the `data` envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { data })
}

/// A failed request. Rendered with the status code of the error kind.
#[derive(Debug)]
pub struct ApiFailure(pub PortError);

pub type ApiResult<T> = Result<T, ApiFailure>;

impl From<PortError> for ApiFailure {
    fn from(err: PortError) -> Self {
        Self(err)
    }
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(PortError::InvalidRequest(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PortError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PortError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            PortError::Forbidden(_) => StatusCode::FORBIDDEN,
            PortError::NotFound(_) => StatusCode::NOT_FOUND,
            PortError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PortError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            PortError::Internal(detail) => {
                // Backend details stay in the log.
                error!(error = %detail, "request failed");
                "internal error".to_string()
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "request rejected");
                other.message().to_string()
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_its_own_status() {
        let cases = [
            (PortError::InvalidRequest(String::new()), 400),
            (PortError::Unauthorized(String::new()), 401),
            (PortError::Forbidden(String::new()), 403),
            (PortError::NotFound(String::new()), 404),
            (PortError::InvalidPayload(String::new()), 422),
            (PortError::Internal(String::new()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(ApiFailure(err).status().as_u16(), code);
        }
    }

    #[tokio::test]
    async fn internal_details_are_not_exposed() {
        let response =
            ApiFailure(PortError::Internal("Unavailable: dns error".to_string())).into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "internal error");
    }
}
