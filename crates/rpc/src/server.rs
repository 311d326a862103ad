use std::{future::Future, time::Instant};

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{transport::Server, Request, Response, Status};
use tracing::{info, warn};

use common::observability;
use service::{gateway::normalize_key, BatchQuery, EmailGateway, GatewayError};

use crate::proto::mailgate_service_server::{MailgateService, MailgateServiceServer};
use crate::proto::{
    CreateEmailRequest, DeleteEmailRequest, EmailResponse, GetEmailBatchRequest, GetEmailBatchResponse,
    GetEmailRequest, UpdateEmailRequest,
};

const TRANSPORT: &str = "rpc";

/// Streams served concurrently on one connection before the peer has to wait
pub const DEFAULT_MAX_IN_FLIGHT: u32 = 64;

/// Map the shared error taxonomy onto gRPC status codes.
pub fn to_status(e: GatewayError) -> Status {
    let message = e.to_string();
    match e {
        GatewayError::Validation(_) => Status::invalid_argument(message),
        GatewayError::Storage(_) => Status::internal(message),
        GatewayError::Timeout { .. } => Status::deadline_exceeded(message),
    }
}

/// gRPC binding of `EmailGateway`.
///
/// Deadlines come from the gateway, which bounds every store call; the
/// service adds no request-level timeout of its own.
#[derive(Clone)]
pub struct EmailRpcService {
    gateway: EmailGateway,
}

impl EmailRpcService {
    pub fn new(gateway: EmailGateway) -> Self { Self { gateway } }
}

async fn observe<T, F>(op: &'static str, operation: F) -> Result<T, Status>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    let started = Instant::now();
    let result = operation.await;
    observability::record_request(TRANSPORT, op, result.is_ok(), started.elapsed());
    result.map_err(|e| {
        warn!(transport = TRANSPORT, op, kind = e.kind(), error = %e, "email request failed");
        to_status(e)
    })
}

#[tonic::async_trait]
impl MailgateService for EmailRpcService {
    async fn create_email(&self, request: Request<CreateEmailRequest>) -> Result<Response<EmailResponse>, Status> {
        let req = request.into_inner();
        info!(transport = TRANSPORT, op = "create_email", email = %normalize_key(&req.email_addr), "email request");
        let entry = observe("create_email", self.gateway.create(&req.email_addr)).await?;
        Ok(Response::new(EmailResponse { email_entry: entry.map(Into::into) }))
    }

    async fn get_email(&self, request: Request<GetEmailRequest>) -> Result<Response<EmailResponse>, Status> {
        let req = request.into_inner();
        info!(transport = TRANSPORT, op = "get_email", email = %normalize_key(&req.email_addr), "email request");
        let entry = observe("get_email", self.gateway.get(&req.email_addr)).await?;
        Ok(Response::new(EmailResponse { email_entry: entry.map(Into::into) }))
    }

    async fn get_email_batch(
        &self,
        request: Request<GetEmailBatchRequest>,
    ) -> Result<Response<GetEmailBatchResponse>, Status> {
        let req = request.into_inner();
        info!(transport = TRANSPORT, op = "get_email_batch", count = req.count, page = req.page, "email request");
        let entries = observe("get_email_batch", self.gateway.get_batch(BatchQuery::new(req.count, req.page))).await?;
        Ok(Response::new(GetEmailBatchResponse { email_entries: entries.into_iter().map(Into::into).collect() }))
    }

    async fn update_email(&self, request: Request<UpdateEmailRequest>) -> Result<Response<EmailResponse>, Status> {
        let entry: common::EmailEntry = request
            .into_inner()
            .email_entry
            .ok_or_else(|| Status::invalid_argument("email_entry is required"))?
            .into();
        info!(
            transport = TRANSPORT,
            op = "update_email",
            email = %normalize_key(&entry.email),
            confirmed_at = entry.confirmed_at,
            "email request"
        );
        let entry = observe("update_email", self.gateway.update(entry)).await?;
        Ok(Response::new(EmailResponse { email_entry: entry.map(Into::into) }))
    }

    async fn delete_email(&self, request: Request<DeleteEmailRequest>) -> Result<Response<EmailResponse>, Status> {
        let req = request.into_inner();
        info!(transport = TRANSPORT, op = "delete_email", email = %normalize_key(&req.email_addr), "email request");
        let entry = observe("delete_email", self.gateway.delete(&req.email_addr)).await?;
        Ok(Response::new(EmailResponse { email_entry: entry.map(Into::into) }))
    }
}

/// Listener wrapper serving [`EmailRpcService`].
pub struct RpcServer {
    service: EmailRpcService,
    max_in_flight: u32,
}

impl RpcServer {
    pub fn new(gateway: EmailGateway) -> Self {
        Self { service: EmailRpcService::new(gateway), max_in_flight: DEFAULT_MAX_IN_FLIGHT }
    }

    /// Cap concurrent streams per connection; further streams wait for a slot.
    pub fn with_max_in_flight(mut self, max_in_flight: u32) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Serve until the listener fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), tonic::transport::Error> {
        if let Ok(addr) = listener.local_addr() {
            info!(service = "rpc", event = "listening", %addr, max_in_flight = self.max_in_flight, "rpc server listening");
        }
        Server::builder()
            .max_concurrent_streams(self.max_in_flight)
            .concurrency_limit_per_connection(self.max_in_flight as usize)
            .add_service(MailgateServiceServer::new(self.service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
    }
}
