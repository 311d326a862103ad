use axum::{extract::State, response::Response};
use tracing::info;

use common::EmailEntry;
use service::{gateway::normalize_key, BatchQuery};

use crate::envelope::{respond, TRANSPORT};
use crate::extract::LenientJson;
use crate::routes::AppState;

/// POST /email/create
pub async fn create_email(State(state): State<AppState>, LenientJson(body): LenientJson<EmailEntry>) -> Response {
    info!(transport = TRANSPORT, op = "create_email", email = %normalize_key(&body.email), "request");
    respond("create_email", state.gateway.create(&body.email)).await
}

/// GET /email/get
pub async fn get_email(State(state): State<AppState>, LenientJson(body): LenientJson<EmailEntry>) -> Response {
    info!(transport = TRANSPORT, op = "get_email", email = %normalize_key(&body.email), "request");
    respond("get_email", state.gateway.get(&body.email)).await
}

/// GET /email/get_batch
pub async fn get_email_batch(State(state): State<AppState>, LenientJson(query): LenientJson<BatchQuery>) -> Response {
    info!(transport = TRANSPORT, op = "get_email_batch", count = query.count, page = query.page, "request");
    respond("get_email_batch", state.gateway.get_batch(query)).await
}

/// PUT /email/update
pub async fn update_email(State(state): State<AppState>, LenientJson(body): LenientJson<EmailEntry>) -> Response {
    info!(
        transport = TRANSPORT,
        op = "update_email",
        email = %normalize_key(&body.email),
        confirmed_at = body.confirmed_at,
        "request"
    );
    respond("update_email", state.gateway.update(body)).await
}

/// POST /email/delete
pub async fn delete_email(State(state): State<AppState>, LenientJson(body): LenientJson<EmailEntry>) -> Response {
    info!(transport = TRANSPORT, op = "delete_email", email = %normalize_key(&body.email), "request");
    respond("delete_email", state.gateway.delete(&body.email)).await
}
