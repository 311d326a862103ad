//! Scripted RPC client: runs the fixed create/update/read/delete/page
//! scenario against a running gateway and exits non-zero on any mismatch.

use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

use rpc::driver::run_scenario;
use rpc::EmailRpcClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let addr = std::env::var("MAILGATE_RPC_ADDR").unwrap_or_else(|_| configs::DEFAULT_RPC_ADDR.to_string());
    info!(service = "client", event = "start", %addr, "running rpc scenario");

    let mut client = match EmailRpcClient::connect(&addr).await {
        Ok(c) => c,
        Err(e) => {
            error!(service = "client", event = "connect_failed", %addr, error = %e, "cannot reach gateway");
            return ExitCode::FAILURE;
        }
    };

    let report = match run_scenario(&mut client).await {
        Ok(r) => r,
        Err(e) => {
            error!(service = "client", event = "call_failed", error = %e, "scenario aborted");
            return ExitCode::FAILURE;
        }
    };

    for (i, page) in report.pages.iter().enumerate() {
        info!(service = "client", page = i + 1, entries = page.len(), "batch page");
    }

    match report.verify() {
        Ok(()) => {
            info!(service = "client", event = "done", "scenario passed");
            ExitCode::SUCCESS
        }
        Err(msg) => {
            error!(service = "client", event = "mismatch", reason = %msg, "scenario failed");
            ExitCode::FAILURE
        }
    }
}
