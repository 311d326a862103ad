//! Uniform JSON envelope for every `/email/*` response
//!
//! A body is either `{"data": ...}` or `{"error": "..."}`, never both.

use std::{future::Future, time::Instant};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use common::observability;
use service::GatewayError;

use crate::errors::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TRANSPORT: &str = "http";

// `Error` is listed first so untagged decoding of `{"error": ..}` cannot
// fall through to `Data` when `T` is an `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Error { error: String },
    Data { data: T },
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self { Envelope::Data { data } }

    pub fn error(msg: impl Into<String>) -> Self { Envelope::Error { error: msg.into() } }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Envelope::Data { data } => Ok(data),
            Envelope::Error { error } => Err(error),
        }
    }
}

/// Serialize an envelope with the JSON content type. A serialization failure
/// is logged and answered with a bare 500 and no body.
pub fn encode<T: Serialize>(status: StatusCode, envelope: &Envelope<T>) -> Response {
    match serde_json::to_vec(envelope) {
        Ok(body) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode response envelope");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Run one gateway operation and turn its outcome into an envelope response.
pub async fn respond<T, F>(op: &'static str, operation: F) -> Response
where
    T: Serialize,
    F: Future<Output = Result<T, GatewayError>>,
{
    let started = Instant::now();
    let result = operation.await;
    observability::record_request(TRANSPORT, op, result.is_ok(), started.elapsed());
    match result {
        Ok(data) => encode(StatusCode::OK, &Envelope::data(data)),
        Err(e) => {
            warn!(transport = TRANSPORT, op, kind = e.kind(), error = %e, "email request failed");
            ApiError(e).into_response()
        }
    }
}
