use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use service::GatewayError;

use crate::envelope::{encode, Envelope};

/// Gateway failure rendered as an `{"error": ...}` envelope.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        encode(status, &Envelope::<()>::error(self.0.to_string()))
    }
}
