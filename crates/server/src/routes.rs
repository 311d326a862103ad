pub mod email;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::{observability, types::Health};
use service::EmailGateway;

#[derive(Clone)]
pub struct AppState {
    pub gateway: EmailGateway,
}

impl AppState {
    pub fn new(gateway: EmailGateway) -> Self { Self { gateway } }
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> Response {
    let (status, body) = observability::encode_metrics();
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response()
}

/// Requests with an unrouted method on a known path get an empty 200.
async fn ignore_method() -> StatusCode {
    StatusCode::OK
}

/// Build the HTTP router: the five `/email/*` operations plus health and metrics
pub fn build_router(state: AppState) -> Router {
    let email_routes = Router::new()
        .route("/email/create", post(email::create_email).fallback(ignore_method))
        .route("/email/get", get(email::get_email).fallback(ignore_method))
        .route("/email/get_batch", get(email::get_email_batch).fallback(ignore_method))
        .route("/email/update", put(email::update_email).fallback(ignore_method))
        .route("/email/delete", post(email::delete_email).fallback(ignore_method));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(email_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
