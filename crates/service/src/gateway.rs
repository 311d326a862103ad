use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, instrument, warn};

use common::EmailEntry;

use crate::errors::{GatewayError, StoreError};
use crate::pagination::BatchQuery;
use crate::storage::EmailStore;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest accepted key, in characters; matches the `emails.email` column.
pub const MAX_KEY_LEN: usize = 255;

/// Transport-neutral email operations shared by the HTTP and RPC adapters.
///
/// Every store call is bounded by `call_timeout`. Create, update and delete
/// re-read the key after a successful mutation and return the stored state,
/// never the caller's input. A failed mutation skips the re-read.
#[derive(Clone)]
pub struct EmailGateway {
    store: Arc<dyn EmailStore>,
    call_timeout: Duration,
}

/// Keys are compared after trimming surrounding whitespace.
pub fn normalize_key(email: &str) -> &str {
    email.trim()
}

fn required_key(email: &str) -> Result<&str, GatewayError> {
    let key = normalize_key(email);
    if key.is_empty() {
        return Err(GatewayError::validation("email field is required"));
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(GatewayError::validation(format!("email longer than {MAX_KEY_LEN} characters")));
    }
    Ok(key)
}

impl EmailGateway {
    pub fn new(store: Arc<dyn EmailStore>) -> Self {
        Self { store, call_timeout: DEFAULT_CALL_TIMEOUT }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration { self.call_timeout }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                debug!(op, error = %e, "store call failed");
                Err(GatewayError::Storage(e))
            }
            Err(_) => {
                warn!(op, timeout_ms = self.call_timeout.as_millis() as u64, "store call timed out");
                Err(GatewayError::Timeout { op, after: self.call_timeout })
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create(&self, email: &str) -> Result<Option<EmailEntry>, GatewayError> {
        let key = required_key(email)?;
        self.bounded("create_email", self.store.create_email(key)).await?;
        self.bounded("get_email", self.store.get_email(key)).await
    }

    /// Absence is `Ok(None)`, including for an empty key.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, email: &str) -> Result<Option<EmailEntry>, GatewayError> {
        let key = normalize_key(email);
        if key.is_empty() {
            return Ok(None);
        }
        self.bounded("get_email", self.store.get_email(key)).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_batch(&self, query: BatchQuery) -> Result<Vec<EmailEntry>, GatewayError> {
        let query = query.validate()?;
        self.bounded("get_email_batch", self.store.get_email_batch(query)).await
    }

    #[instrument(level = "debug", skip(self), fields(email = %entry.email))]
    pub async fn update(&self, entry: EmailEntry) -> Result<Option<EmailEntry>, GatewayError> {
        let key = required_key(&entry.email)?.to_string();
        let entry = EmailEntry { email: key, ..entry };
        self.bounded("update_email", self.store.update_email(&entry)).await?;
        self.bounded("get_email", self.store.get_email(&entry.email)).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, email: &str) -> Result<Option<EmailEntry>, GatewayError> {
        let key = required_key(email)?;
        self.bounded("delete_email", self.store.delete_email(key)).await?;
        self.bounded("get_email", self.store.get_email(key)).await
    }
}
