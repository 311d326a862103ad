use std::{future::Future, time::Duration};

use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::Response;

use common::EmailEntry;

use crate::proto::mailgate_service_client::MailgateServiceClient;
use crate::proto::{
    CreateEmailRequest, DeleteEmailRequest, EmailResponse, GetEmailBatchRequest, GetEmailRequest,
    UpdateEmailRequest,
};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("{method} timed out after {after:?}")]
    Timeout { method: &'static str, after: Duration },
    #[error("rpc status {}: {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),
}

/// Typed client for the email gRPC service.
///
/// Every call is bounded by the client timeout. Clones share one channel.
#[derive(Clone)]
pub struct EmailRpcClient {
    inner: MailgateServiceClient<Channel>,
    timeout: Duration,
}

impl EmailRpcClient {
    pub async fn connect(addr: &str) -> Result<Self, RpcError> {
        Self::connect_with_timeout(addr, DEFAULT_CALL_TIMEOUT).await
    }

    /// `addr` is `host:port`; a full `http://` URI is accepted too.
    pub async fn connect_with_timeout(addr: &str, timeout: Duration) -> Result<Self, RpcError> {
        let uri = if addr.contains("://") { addr.to_string() } else { format!("http://{addr}") };
        let channel = Endpoint::from_shared(uri)?
            .connect_timeout(timeout)
            .tcp_nodelay(true)
            .connect()
            .await?;
        Ok(Self { inner: MailgateServiceClient::new(channel), timeout })
    }

    pub fn timeout(&self) -> Duration { self.timeout }

    async fn bounded<T, F>(&self, method: &'static str, call: F) -> Result<T, RpcError>
    where
        F: Future<Output = Result<Response<T>, tonic::Status>>,
    {
        let after = self.timeout;
        match tokio::time::timeout(after, call).await {
            Ok(res) => Ok(res?.into_inner()),
            Err(_) => Err(RpcError::Timeout { method, after }),
        }
    }

    pub async fn create_email(&mut self, addr: &str) -> Result<Option<EmailEntry>, RpcError> {
        let req = CreateEmailRequest { email_addr: addr.to_string() };
        let mut inner = self.inner.clone();
        let res: EmailResponse = self.bounded("create_email", inner.create_email(req)).await?;
        Ok(res.email_entry.map(Into::into))
    }

    pub async fn get_email(&mut self, addr: &str) -> Result<Option<EmailEntry>, RpcError> {
        let req = GetEmailRequest { email_addr: addr.to_string() };
        let mut inner = self.inner.clone();
        let res = self.bounded("get_email", inner.get_email(req)).await?;
        Ok(res.email_entry.map(Into::into))
    }

    pub async fn get_email_batch(&mut self, count: i32, page: i32) -> Result<Vec<EmailEntry>, RpcError> {
        let req = GetEmailBatchRequest { count, page };
        let mut inner = self.inner.clone();
        let res = self.bounded("get_email_batch", inner.get_email_batch(req)).await?;
        Ok(res.email_entries.into_iter().map(Into::into).collect())
    }

    pub async fn update_email(&mut self, entry: EmailEntry) -> Result<Option<EmailEntry>, RpcError> {
        let req = UpdateEmailRequest { email_entry: Some(entry.into()) };
        let mut inner = self.inner.clone();
        let res = self.bounded("update_email", inner.update_email(req)).await?;
        Ok(res.email_entry.map(Into::into))
    }

    pub async fn delete_email(&mut self, addr: &str) -> Result<Option<EmailEntry>, RpcError> {
        let req = DeleteEmailRequest { email_addr: addr.to_string() };
        let mut inner = self.inner.clone();
        let res = self.bounded("delete_email", inner.delete_email(req)).await?;
        Ok(res.email_entry.map(Into::into))
    }
}
