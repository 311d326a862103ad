//! Conformance driver exercising the RPC transport end to end.
//!
//! create → set `confirmed_at` → update → get → delete → get, then three
//! sequential batch pages. Errors are returned to the caller, never fatal.

use tracing::info;

use common::EmailEntry;

use crate::client::{EmailRpcClient, RpcError};

pub const SCENARIO_EMAIL: &str = "999@999.999";
pub const SCENARIO_CONFIRMED_AT: i64 = 10000;
pub const SCENARIO_PAGE_SIZE: i32 = 3;
pub const SCENARIO_PAGES: i32 = 3;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub created: Option<EmailEntry>,
    pub updated: Option<EmailEntry>,
    pub fetched_after_update: Option<EmailEntry>,
    pub deleted: Option<EmailEntry>,
    pub fetched_after_delete: Option<EmailEntry>,
    /// Batch pages 1..=SCENARIO_PAGES in request order
    pub pages: Vec<Vec<EmailEntry>>,
}

impl ScenarioReport {
    /// Check the observed responses against the expected lifecycle.
    pub fn verify(&self) -> Result<(), String> {
        match &self.created {
            Some(e) if e.email == SCENARIO_EMAIL && e.confirmed_at == 0 => {}
            other => return Err(format!("create returned {other:?}")),
        }
        match &self.updated {
            Some(e) if e.confirmed_at == SCENARIO_CONFIRMED_AT => {}
            other => return Err(format!("update returned {other:?}")),
        }
        if self.fetched_after_update != self.updated {
            return Err(format!("get after update returned {:?}", self.fetched_after_update));
        }
        if self.deleted.is_some() || self.fetched_after_delete.is_some() {
            return Err(format!("entry still present after delete: {:?}", self.fetched_after_delete));
        }
        if self.pages.iter().flatten().any(|e| e.email == SCENARIO_EMAIL) {
            return Err("deleted entry listed in a batch page".into());
        }
        Ok(())
    }
}

fn log_response(method: &str, entry: &Option<EmailEntry>) {
    match entry {
        Some(e) => info!(method, email = %e.email, confirmed_at = e.confirmed_at, "rpc response"),
        None => info!(method, "email not found"),
    }
}

pub async fn run_scenario(client: &mut EmailRpcClient) -> Result<ScenarioReport, RpcError> {
    let mut report = ScenarioReport::default();

    info!("create email");
    report.created = client.create_email(SCENARIO_EMAIL).await?;
    log_response("create_email", &report.created);

    let mut entry = report.created.clone().unwrap_or_else(|| EmailEntry::new(SCENARIO_EMAIL));
    entry.confirmed_at = SCENARIO_CONFIRMED_AT;

    info!("update email");
    report.updated = client.update_email(entry).await?;
    log_response("update_email", &report.updated);

    info!("get email");
    report.fetched_after_update = client.get_email(SCENARIO_EMAIL).await?;
    log_response("get_email", &report.fetched_after_update);

    info!("delete email");
    report.deleted = client.delete_email(SCENARIO_EMAIL).await?;
    log_response("delete_email", &report.deleted);

    report.fetched_after_delete = client.get_email(SCENARIO_EMAIL).await?;
    log_response("get_email", &report.fetched_after_delete);

    for page in 1..=SCENARIO_PAGES {
        info!(count = SCENARIO_PAGE_SIZE, page, "get email batch");
        let entries = client.get_email_batch(SCENARIO_PAGE_SIZE, page).await?;
        let total = entries.len();
        for (i, e) in entries.iter().enumerate() {
            info!(item = i + 1, total, email = %e.email, confirmed_at = e.confirmed_at, "batch item");
        }
        report.pages.push(entries);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_report() -> ScenarioReport {
        let updated = EmailEntry { email: SCENARIO_EMAIL.into(), confirmed_at: SCENARIO_CONFIRMED_AT };
        ScenarioReport {
            created: Some(EmailEntry::new(SCENARIO_EMAIL)),
            updated: Some(updated.clone()),
            fetched_after_update: Some(updated),
            deleted: None,
            fetched_after_delete: None,
            pages: vec![vec![EmailEntry::new("a@x")], vec![], vec![]],
        }
    }

    #[test]
    fn verify_accepts_the_expected_lifecycle() {
        assert_eq!(good_report().verify(), Ok(()));
    }

    #[test]
    fn verify_flags_an_echoed_or_lingering_entry() {
        let mut r = good_report();
        r.updated = Some(EmailEntry::new(SCENARIO_EMAIL));
        assert!(r.verify().is_err());

        let mut r = good_report();
        r.fetched_after_delete = r.created.clone();
        assert!(r.verify().is_err());
    }
}
