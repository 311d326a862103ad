use serde_json::{json, Value};
use tokio::net::TcpListener;

use common::EmailEntry;
use rpc::{EmailRpcClient, RpcServer};
use server::build_app;
use server::envelope::Envelope;
use service::{EmailGateway, MemoryEmailStore};

struct TestApp {
    base_url: String,
    rpc_addr: String,
}

/// Serve both transports over one in-memory gateway on ephemeral ports.
async fn start_server() -> anyhow::Result<TestApp> {
    let gateway = EmailGateway::new(MemoryEmailStore::new());

    let http = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let base_url = format!("http://{}", http.local_addr()?);
    let app = build_app(gateway.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(http, app).await { eprintln!("http server error: {}", e); }
    });

    let rpc = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let rpc_addr = rpc.local_addr()?.to_string();
    let rpc_server = RpcServer::new(gateway);
    tokio::spawn(async move {
        if let Err(e) = rpc_server.serve(rpc).await { eprintln!("rpc server error: {}", e); }
    });

    Ok(TestApp { base_url, rpc_addr })
}

async fn http_get(client: &reqwest::Client, base: &str, email: &str) -> anyhow::Result<Option<EmailEntry>> {
    let res = client.get(format!("{base}/email/get")).json(&json!({"email": email})).send().await?;
    let env: Envelope<Option<EmailEntry>> = res.json().await?;
    env.into_result().map_err(anyhow::Error::msg)
}

#[tokio::test]
async fn writes_through_one_transport_are_visible_through_the_other() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = reqwest::Client::new();
    let mut rpc = EmailRpcClient::connect(&app.rpc_addr).await?;

    // create over rpc, read over http
    rpc.create_email("x@y.z").await?;
    assert_eq!(http_get(&http, &app.base_url, "x@y.z").await?, Some(EmailEntry::new("x@y.z")));

    // update over http, read over rpc
    let res = http
        .put(format!("{}/email/update", app.base_url))
        .json(&json!({"email": "x@y.z", "confirmedAt": 7}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["confirmedAt"], 7);
    assert_eq!(rpc.get_email("x@y.z").await?.map(|e| e.confirmed_at), Some(7));

    // delete over rpc, absent on both
    assert_eq!(rpc.delete_email("x@y.z").await?, None);
    assert_eq!(http_get(&http, &app.base_url, "x@y.z").await?, None);
    assert_eq!(rpc.get_email("x@y.z").await?, None);
    Ok(())
}

#[tokio::test]
async fn both_transports_page_the_same_way() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = reqwest::Client::new();
    let mut rpc = EmailRpcClient::connect(&app.rpc_addr).await?;
    for i in 0..5 {
        rpc.create_email(&format!("p{i}@x.y")).await?;
    }

    for page in 1..=3 {
        let over_rpc = rpc.get_email_batch(2, page).await?;
        let res = http
            .get(format!("{}/email/get_batch", app.base_url))
            .json(&json!({"count": 2, "page": page}))
            .send()
            .await?;
        let env: Envelope<Vec<EmailEntry>> = res.json().await?;
        let over_http = env.into_result().map_err(anyhow::Error::msg)?;
        assert_eq!(over_rpc, over_http);
    }
    Ok(())
}

#[tokio::test]
async fn validation_failures_agree() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = reqwest::Client::new();
    let mut rpc = EmailRpcClient::connect(&app.rpc_addr).await?;

    let res = http
        .get(format!("{}/email/get_batch", app.base_url))
        .json(&json!({"count": 0, "page": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let env: Envelope<Vec<EmailEntry>> = res.json().await?;
    let http_msg = env.into_result().err();

    let rpc_msg = match rpc.get_email_batch(0, 1).await {
        Err(rpc::RpcError::Status(status)) => Some(status.message().to_string()),
        other => panic!("expected status error, got {other:?}"),
    };
    assert_eq!(http_msg, rpc_msg);
    Ok(())
}
