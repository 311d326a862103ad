use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;

/// Permissive JSON body extractor.
///
/// Reads the body whatever the `Content-Type` (GET requests carry bodies
/// here too) and decodes it into `T`. An unreadable body or malformed JSON
/// yields `T::default()`; absent fields take their zero values.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.unwrap_or_default();
        let value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                if !body.is_empty() {
                    debug!(error = %e, "request body is not valid JSON; using zero values");
                }
                T::default()
            }
        };
        Ok(Self(value))
    }
}
