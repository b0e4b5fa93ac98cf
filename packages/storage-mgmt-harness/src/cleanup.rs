//! Best-effort removal of accounts left behind by tests.

use std::fmt;

use storage_mgmt_client::{ErrorKind, ManagementError, StorageManagementClient};

/// One step of the cleanup that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    /// Account whose delete failed, or `None` when listing failed
    pub account: Option<String>,
    /// Kind of the error raised
    pub kind: ErrorKind,
    /// Rendered error
    pub message: String,
}

impl CleanupFailure {
    fn new(account: Option<&str>, err: &ManagementError) -> Self {
        Self {
            account: account.map(str::to_string),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a cleanup pass. Never fatal to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Accounts that were deleted
    pub deleted: Vec<String>,
    /// Steps that failed
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// Whether every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures of the given kind.
    pub fn failures_of(&self, kind: ErrorKind) -> impl Iterator<Item = &CleanupFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deleted {} account(s), {} failure(s)",
            self.deleted.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            let target = failure.account.as_deref().unwrap_or("<list>");
            write!(f, "\n  {} [{}]: {}", target, failure.kind, failure.message)?;
        }
        Ok(())
    }
}

/// Deletes every account whose name starts with `prefix`, one at a time.
///
/// Failures are recorded in the report and logged; a failed list ends the
/// pass with a single failure.
pub async fn delete_accounts_with_prefix(
    client: &StorageManagementClient,
    prefix: &str,
) -> CleanupReport {
    let mut report = CleanupReport::default();
    let operations = client.storage_accounts();

    let listed = match operations.list().await {
        Ok(listed) => listed,
        Err(err) => {
            tracing::warn!(kind = %err.kind(), "Cleanup could not list accounts: {}", err);
            report.failures.push(CleanupFailure::new(None, &err));
            return report;
        }
    };

    for account in listed
        .storage_accounts
        .iter()
        .filter(|account| account.name.starts_with(prefix))
    {
        match operations.delete(&account.name).await {
            Ok(_) => report.deleted.push(account.name.clone()),
            Err(err) => {
                tracing::warn!(
                    account = %account.name,
                    kind = %err.kind(),
                    "Cleanup could not delete account: {}",
                    err
                );
                report
                    .failures
                    .push(CleanupFailure::new(Some(&account.name), &err));
            }
        }
    }

    tracing::debug!(%report, "Cleanup finished");
    report
}
