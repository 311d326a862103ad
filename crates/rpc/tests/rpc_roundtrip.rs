use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tonic::Code;

use common::EmailEntry;
use rpc::driver::{run_scenario, SCENARIO_CONFIRMED_AT, SCENARIO_EMAIL};
use rpc::{EmailRpcClient, RpcError, RpcServer};
use service::{BatchQuery, EmailGateway, EmailStore, MemoryEmailStore, StoreError};

/// Memory store that sleeps before every call.
struct DelayedStore {
    inner: Arc<MemoryEmailStore>,
    delay: Duration,
}

impl DelayedStore {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { inner: MemoryEmailStore::new(), delay })
    }
}

#[async_trait]
impl EmailStore for DelayedStore {
    async fn create_email(&self, email: &str) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create_email(email).await
    }
    async fn get_email(&self, email: &str) -> Result<Option<EmailEntry>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_email(email).await
    }
    async fn get_email_batch(&self, query: BatchQuery) -> Result<Vec<EmailEntry>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_email_batch(query).await
    }
    async fn update_email(&self, entry: &EmailEntry) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_email(entry).await
    }
    async fn delete_email(&self, email: &str) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_email(email).await
    }
}

async fn start_server_with(server: RpcServer) -> anyhow::Result<String> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?.to_string();
    tokio::spawn(async move {
        if let Err(e) = server.serve(listener).await { eprintln!("rpc server error: {}", e); }
    });
    Ok(addr)
}

async fn start_server() -> anyhow::Result<String> {
    start_server_with(RpcServer::new(EmailGateway::new(MemoryEmailStore::new()))).await
}

#[tokio::test]
async fn scenario_passes_against_a_live_server() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut client = EmailRpcClient::connect(&addr).await?;

    let report = run_scenario(&mut client).await?;
    assert_eq!(report.verify(), Ok(()));
    assert_eq!(report.updated.as_ref().map(|e| e.confirmed_at), Some(SCENARIO_CONFIRMED_AT));
    assert_eq!(report.pages.len(), 3);
    assert!(client.get_email(SCENARIO_EMAIL).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn batch_pages_cover_every_entry_once() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut client = EmailRpcClient::connect(&addr).await?;
    for i in 0..8 {
        client.create_email(&format!("user{i}@example.com")).await?;
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let entries = client.get_email_batch(3, page).await?;
        assert!(entries.len() <= 3);
        seen.extend(entries.into_iter().map(|e| e.email));
    }
    let expected: Vec<String> = (0..8).map(|i| format!("user{i}@example.com")).collect();
    assert_eq!(seen, expected);
    Ok(())
}

#[tokio::test]
async fn errors_come_back_as_status_without_closing_the_channel() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut client = EmailRpcClient::connect(&addr).await?;

    match client.get_email_batch(0, 1).await {
        Err(RpcError::Status(status)) => assert_eq!(status.code(), Code::InvalidArgument),
        other => panic!("expected invalid argument, got {other:?}"),
    }

    client.create_email("dup@example.com").await?;
    match client.create_email("dup@example.com").await {
        Err(RpcError::Status(status)) => assert_eq!(status.code(), Code::Internal),
        other => panic!("expected internal, got {other:?}"),
    }

    let entry = client.get_email("dup@example.com").await?;
    assert_eq!(entry.map(|e| e.email), Some("dup@example.com".to_string()));
    Ok(())
}

#[tokio::test]
async fn slow_mutation_within_per_call_bound_succeeds() -> anyhow::Result<()> {
    // each store call fits the bound, mutate plus re-read does not
    let gateway = EmailGateway::new(DelayedStore::new(Duration::from_millis(120)))
        .with_timeout(Duration::from_millis(200));
    let addr = start_server_with(RpcServer::new(gateway.clone())).await?;
    let mut client = EmailRpcClient::connect(&addr).await?;

    let direct = gateway.create("a@b.c").await?;
    let over_rpc = client.create_email("b@b.c").await?;
    assert_eq!(direct.map(|e| e.email), Some("a@b.c".to_string()));
    assert_eq!(over_rpc.map(|e| e.email), Some("b@b.c".to_string()));
    Ok(())
}

#[tokio::test]
async fn gateway_timeout_is_deadline_exceeded() -> anyhow::Result<()> {
    let gateway = EmailGateway::new(DelayedStore::new(Duration::from_millis(300)))
        .with_timeout(Duration::from_millis(50));
    let addr = start_server_with(RpcServer::new(gateway)).await?;
    let mut client = EmailRpcClient::connect(&addr).await?;

    match client.get_email("a@b.c").await {
        Err(RpcError::Status(status)) => assert_eq!(status.code(), Code::DeadlineExceeded),
        other => panic!("expected deadline exceeded, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn client_timeout_leaves_the_channel_usable() -> anyhow::Result<()> {
    let gateway = EmailGateway::new(DelayedStore::new(Duration::from_millis(200)))
        .with_timeout(Duration::from_secs(5));
    let addr = start_server_with(RpcServer::new(gateway)).await?;

    let mut impatient = EmailRpcClient::connect_with_timeout(&addr, Duration::from_millis(50)).await?;
    assert!(matches!(impatient.get_email("a@b.c").await, Err(RpcError::Timeout { method: "get_email", .. })));

    let mut patient = EmailRpcClient::connect(&addr).await?;
    assert_eq!(patient.get_email("a@b.c").await?, None);
    Ok(())
}

#[tokio::test]
async fn pipelined_calls_beyond_the_stream_cap_all_complete() -> anyhow::Result<()> {
    let gateway = EmailGateway::new(DelayedStore::new(Duration::from_millis(20)));
    let addr = start_server_with(RpcServer::new(gateway).with_max_in_flight(4)).await?;
    let client = EmailRpcClient::connect_with_timeout(&addr, Duration::from_secs(5)).await?;

    let mut calls = tokio::task::JoinSet::new();
    for i in 0..32 {
        let mut client = client.clone();
        calls.spawn(async move { client.create_email(&format!("p{i:02}@x.y")).await });
    }
    let mut created = 0;
    while let Some(res) = calls.join_next().await {
        assert!(res??.is_some());
        created += 1;
    }
    assert_eq!(created, 32);

    let mut client = client;
    assert_eq!(client.get_email_batch(100, 1).await?.len(), 32);
    Ok(())
}
