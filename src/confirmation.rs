//! How long to wait after a cancel is submitted before the gift list reloads.
//!
//! `FixedDelay` sleeps for the configured settle delay and assumes the ledger
//! caught up. `PollForFinality` asks the node for the transaction until it is
//! committed or the timeout elapses.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::rpc::LedgerRpc;
use crate::types::SubmittedTransaction;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfirmationPolicy {
    FixedDelay { delay_ms: u64 },
    PollForFinality { interval_ms: u64, timeout_ms: u64 },
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        ConfirmationPolicy::FixedDelay { delay_ms: 0 }
    }
}

impl ConfirmationPolicy {
    pub fn poll_default() -> Self {
        ConfirmationPolicy::PollForFinality {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConfirmationPolicy::FixedDelay { .. } => "Fixed settle delay",
            ConfirmationPolicy::PollForFinality { .. } => "Poll for finality",
        }
    }

    pub fn description(&self) -> String {
        match self {
            ConfirmationPolicy::FixedDelay { delay_ms } => format!(
                "Wait {} ms after submitting, then reload. The list may still show the gift if the ledger is slower.",
                delay_ms
            ),
            ConfirmationPolicy::PollForFinality {
                interval_ms,
                timeout_ms,
            } => format!(
                "Check the transaction every {} ms until it is committed (give up after {} s).",
                interval_ms,
                timeout_ms / 1000
            ),
        }
    }
}

/// What the confirmation step observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The fixed delay elapsed; finality was not checked
    Settled,
    /// The node reports the transaction committed successfully
    Committed,
    /// The transaction committed but the VM rejected it
    Failed { vm_status: String },
    /// Polling gave up
    TimedOut,
}

pub async fn await_confirmation(
    policy: ConfirmationPolicy,
    rpc: &dyn LedgerRpc,
    tx: &SubmittedTransaction,
) -> Confirmation {
    match policy {
        ConfirmationPolicy::FixedDelay { delay_ms } => {
            debug!("Settling for {} ms after {}", delay_ms, tx.hash);
            sleep(Duration::from_millis(delay_ms)).await;
            Confirmation::Settled
        }
        ConfirmationPolicy::PollForFinality {
            interval_ms,
            timeout_ms,
        } => poll_for_finality(rpc, &tx.hash, interval_ms, timeout_ms).await,
    }
}

async fn poll_for_finality(
    rpc: &dyn LedgerRpc,
    hash: &str,
    interval_ms: u64,
    timeout_ms: u64,
) -> Confirmation {
    let started = Instant::now();
    let deadline = Duration::from_millis(timeout_ms);
    let interval = Duration::from_millis(interval_ms.max(1));

    loop {
        match rpc.transaction_by_hash(hash).await {
            Ok(info) if !info.is_pending() => {
                return match info.success {
                    Some(false) => {
                        let vm_status = info.vm_status.unwrap_or_else(|| "unknown".to_string());
                        warn!("Transaction {} failed on chain: {}", hash, vm_status);
                        Confirmation::Failed { vm_status }
                    }
                    _ => {
                        info!("Transaction {} committed after {:?}", hash, started.elapsed());
                        Confirmation::Committed
                    }
                };
            }
            Ok(_) => debug!("Transaction {} still pending", hash),
            Err(e) if e.is_not_found() => debug!("Transaction {} not yet visible", hash),
            Err(e) => warn!("Lookup of {} failed: {}", hash, e),
        }

        if started.elapsed() + interval > deadline {
            warn!("Gave up waiting for {} after {:?}", hash, started.elapsed());
            return Confirmation::TimedOut;
        }
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use crate::types::{TransactionInfo, ViewRequest};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers lookups from a script, repeating the last entry.
    struct ScriptedRpc {
        script: Vec<Result<TransactionInfo, u16>>,
        calls: AtomicUsize,
    }

    impl ScriptedRpc {
        fn new(script: Vec<Result<TransactionInfo, u16>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LedgerRpc for ScriptedRpc {
        async fn view(&self, _request: &ViewRequest) -> Result<serde_json::Value, RpcError> {
            Err(RpcError::InvalidResponse("unused".into()))
        }

        async fn transaction_by_hash(&self, _hash: &str) -> Result<TransactionInfo, RpcError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script[n.min(self.script.len() - 1)].clone();
            step.map_err(|code| RpcError::Status {
                code,
                body: String::new(),
            })
        }
    }

    fn info(kind: &str, success: Option<bool>) -> TransactionInfo {
        TransactionInfo {
            kind: kind.to_string(),
            hash: "0xfeed".to_string(),
            success,
            vm_status: success.map(|s| {
                if s {
                    "Executed successfully".to_string()
                } else {
                    "Move abort: EGIFT_NOT_FOUND".to_string()
                }
            }),
        }
    }

    fn submitted() -> SubmittedTransaction {
        SubmittedTransaction {
            hash: "0xfeed".to_string(),
            committed: None,
            vm_status: None,
        }
    }

    #[tokio::test]
    async fn test_fixed_delay_waits_and_never_polls() {
        let rpc = ScriptedRpc::new(vec![Err(500)]);
        let started = Instant::now();
        let result = await_confirmation(
            ConfirmationPolicy::FixedDelay { delay_ms: 20 },
            &rpc,
            &submitted(),
        )
        .await;
        assert_eq!(result, Confirmation::Settled);
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_poll_returns_committed_after_pending() {
        let rpc = ScriptedRpc::new(vec![
            Err(404),
            Ok(info("pending_transaction", None)),
            Ok(info("user_transaction", Some(true))),
        ]);
        let policy = ConfirmationPolicy::PollForFinality {
            interval_ms: 1,
            timeout_ms: 5_000,
        };
        let result = await_confirmation(policy, &rpc, &submitted()).await;
        assert_eq!(result, Confirmation::Committed);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_reports_vm_failure() {
        let rpc = ScriptedRpc::new(vec![Ok(info("user_transaction", Some(false)))]);
        let policy = ConfirmationPolicy::PollForFinality {
            interval_ms: 1,
            timeout_ms: 1_000,
        };
        match await_confirmation(policy, &rpc, &submitted()).await {
            Confirmation::Failed { vm_status } => assert!(vm_status.contains("EGIFT_NOT_FOUND")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_times_out_while_pending() {
        let rpc = ScriptedRpc::new(vec![Ok(info("pending_transaction", None))]);
        let policy = ConfirmationPolicy::PollForFinality {
            interval_ms: 5,
            timeout_ms: 30,
        };
        let result = await_confirmation(policy, &rpc, &submitted()).await;
        assert_eq!(result, Confirmation::TimedOut);
        assert!(rpc.calls.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_policy_serde_roundtrip_tag() {
        let json = serde_json::to_value(ConfirmationPolicy::poll_default()).unwrap();
        assert_eq!(json["kind"], "poll_for_finality");
        let back: ConfirmationPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(back, ConfirmationPolicy::poll_default());
    }

    #[test]
    fn test_default_policy_is_zero_delay() {
        assert_eq!(
            ConfirmationPolicy::default(),
            ConfirmationPolicy::FixedDelay { delay_ms: 0 }
        );
    }
}
