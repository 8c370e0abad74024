//! The sent-gift list: fetching, reload triggering, cancellation and the
//! table model the GUI renders.
//!
//! Nothing in here touches egui. The GUI feeds [`GiftListView::on_dependencies`]
//! a snapshot of the wallet and operation lock every frame, spawns the fetches
//! it asks for, and hands the outcomes back through [`GiftListView::apply_fetch`].

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::confirmation::{await_confirmation, Confirmation, ConfirmationPolicy};
use crate::error::{RpcError, WalletError};
use crate::operation_lock::{busy_at, OperationLock, OperationLockWriter};
use crate::rpc::LedgerRpc;
use crate::types::{EntryFunctionPayload, Gift, RawGift, ViewRequest};
use crate::units::{
    format_apt, format_release_date, format_release_datetime, truncate_address, DETAIL_PRECISION,
    INLINE_PRECISION,
};
use crate::wallet::WalletProvider;

// ==================== fetching ====================

/// Result of one fetch. Every caller has to branch on it.
#[derive(Debug)]
pub enum FetchOutcome {
    /// No account connected; nothing was requested
    Skipped,
    Loaded(Vec<Gift>),
    Failed(RpcError),
}

pub fn view_request(function: &str, account: &str) -> ViewRequest {
    ViewRequest {
        function: function.to_string(),
        type_arguments: Vec::new(),
        arguments: vec![json!(account)],
    }
}

/// Map a `view_gifters_gifts` response to gifts.
///
/// The node wraps view results in an array of return values, so a single
/// element that is itself an array is unwrapped first.
pub fn parse_gifts_response(value: serde_json::Value) -> Result<Vec<Gift>, RpcError> {
    let mut records = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(RpcError::InvalidResponse(format!(
                "expected an array of gifts, got {}",
                other
            )))
        }
    };
    if records.len() == 1 && records[0].is_array() {
        if let Some(serde_json::Value::Array(inner)) = records.pop() {
            records = inner;
        }
    }

    records
        .into_iter()
        .map(|record| {
            serde_json::from_value::<RawGift>(record)
                .map(Gift::from)
                .map_err(RpcError::from)
        })
        .collect()
}

/// Fetch the gifts sent by `account`. Does nothing without an account.
pub async fn fetch_gifts(rpc: &dyn LedgerRpc, function: &str, account: Option<&str>) -> FetchOutcome {
    let Some(account) = account else {
        debug!("No account connected, skipping gift fetch");
        return FetchOutcome::Skipped;
    };

    let request = view_request(function, account);
    match rpc.view(&request).await.and_then(parse_gifts_response) {
        Ok(gifts) => {
            info!("Loaded {} gifts sent by {}", gifts.len(), account);
            FetchOutcome::Loaded(gifts)
        }
        Err(e) => {
            warn!("Gift fetch for {} failed: {}", account, e);
            FetchOutcome::Failed(e)
        }
    }
}

// ==================== reload trigger ====================

/// The inputs the gift list depends on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dependencies {
    pub account: Option<String>,
    pub connected: bool,
    /// Transaction-in-progress flag from the operation lock
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyChange {
    Account {
        from: Option<String>,
        to: Option<String>,
    },
    Connection(bool),
    Busy(bool),
}

impl Dependencies {
    /// Field-by-field differences from `previous` to `self`.
    pub fn changes_from(&self, previous: &Dependencies) -> Vec<DependencyChange> {
        let mut changes = Vec::new();
        if self.account != previous.account {
            changes.push(DependencyChange::Account {
                from: previous.account.clone(),
                to: self.account.clone(),
            });
        }
        if self.connected != previous.connected {
            changes.push(DependencyChange::Connection(self.connected));
        }
        if self.busy != previous.busy {
            changes.push(DependencyChange::Busy(self.busy));
        }
        changes
    }
}

/// Busy values to feed the trigger for one sample of the operation lock.
///
/// `seen` is the transition count at the previous sample and `transitions`
/// the count now. Each value is derived from the count with [`busy_at`], so
/// the sequence never disagrees with the counter it came from. Every
/// transition in between is replayed in order, which means a cancel that
/// starts and finishes between two samples still yields one value, and one
/// reload, per flip. With nothing observed yet, or nothing new, the current
/// value alone is returned.
pub fn busy_sequence(previous: Option<bool>, seen: u64, transitions: u64) -> Vec<bool> {
    if previous.is_none() || transitions <= seen {
        vec![busy_at(transitions)]
    } else {
        (seen + 1..=transitions).map(busy_at).collect()
    }
}

pub type ChangeListener = Box<dyn FnMut(&DependencyChange)>;

/// Turns dependency changes into reloads.
///
/// Each observed snapshot that differs from the previous one notifies the
/// listeners once per changed field and then issues exactly one reload. The
/// very first snapshot always issues a reload.
#[derive(Default)]
pub struct ReloadTrigger {
    last: Option<Dependencies>,
    generation: u64,
    listeners: Vec<ChangeListener>,
}

impl ReloadTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&DependencyChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Observe a snapshot. Returns the generation of the reload it issued, if any.
    pub fn observe(&mut self, deps: &Dependencies) -> Option<u64> {
        let changes = match &self.last {
            None => Vec::new(),
            Some(previous) if previous == deps => return None,
            Some(previous) => deps.changes_from(previous),
        };
        for change in &changes {
            for listener in self.listeners.iter_mut() {
                listener(change);
            }
        }
        self.last = Some(deps.clone());
        Some(self.reload())
    }

    /// Issue a reload without a dependency change (manual refresh).
    pub fn reload(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> Option<&Dependencies> {
        self.last.as_ref()
    }
}

// ==================== view state ====================

/// A fetch the host should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub generation: u64,
    pub account: Option<String>,
}

/// State of the sent-gift list.
pub struct GiftListView {
    gifts: Vec<Gift>,
    error: Option<String>,
    trigger: ReloadTrigger,
    lock: Arc<OperationLockWriter>,
    /// Lock transitions consumed by the last [`GiftListView::sample`]
    seen_transitions: u64,
}

impl GiftListView {
    pub fn new(lock: OperationLockWriter) -> Self {
        let mut trigger = ReloadTrigger::new();
        trigger.add_listener(|change| debug!("Gift list dependency changed: {:?}", change));
        Self {
            gifts: Vec::new(),
            error: None,
            trigger,
            lock: Arc::new(lock),
            seen_transitions: 0,
        }
    }

    pub fn gifts(&self) -> &[Gift] {
        &self.gifts
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last dependency snapshot fed to the trigger
    pub fn dependencies(&self) -> Option<&Dependencies> {
        self.trigger.current()
    }

    /// True if a fetch issued with `generation` would still be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        generation >= self.trigger.generation()
    }

    /// Drop the list and any error, e.g. after switching networks.
    pub fn clear(&mut self) {
        self.gifts.clear();
        self.error = None;
    }

    /// The single writer of the shared busy flag
    pub fn lock_writer(&self) -> Arc<OperationLockWriter> {
        Arc::clone(&self.lock)
    }

    pub fn lock_reader(&self) -> OperationLock {
        self.lock.reader()
    }

    /// Feed the current dependency snapshot. Clears the list on disconnect.
    pub fn on_dependencies(&mut self, deps: &Dependencies) -> Option<ReloadRequest> {
        let was_connected = self.trigger.current().map(|d| d.connected).unwrap_or(false);
        let generation = self.trigger.observe(deps)?;
        if was_connected && !deps.connected {
            self.gifts.clear();
            self.error = None;
        }
        Some(ReloadRequest {
            generation,
            account: deps.account.clone(),
        })
    }

    /// Sample the operation lock together with the wallet state.
    ///
    /// Reads the transition count once and feeds one snapshot per missed
    /// transition, so a busy pulse shorter than the sampling interval still
    /// reloads after it ends.
    pub fn sample(&mut self, account: Option<&str>, connected: bool) -> Vec<ReloadRequest> {
        let transitions = self.lock.reader().transitions();
        let previous = self.trigger.current().map(|d| d.busy);
        let values = busy_sequence(previous, self.seen_transitions, transitions);
        self.seen_transitions = transitions;

        values
            .into_iter()
            .filter_map(|busy| {
                self.on_dependencies(&Dependencies {
                    account: account.map(str::to_string),
                    connected,
                    busy,
                })
            })
            .collect()
    }

    /// Manual refresh with the last observed dependencies.
    pub fn request_reload(&mut self) -> ReloadRequest {
        let account = self.trigger.current().and_then(|d| d.account.clone());
        ReloadRequest {
            generation: self.trigger.reload(),
            account,
        }
    }

    /// Apply a fetch result. Returns false when it was skipped or stale.
    pub fn apply_fetch(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if !self.is_current(generation) {
            debug!(
                "Discarding stale gift fetch (generation {} < {})",
                generation,
                self.trigger.generation()
            );
            return false;
        }
        match outcome {
            FetchOutcome::Skipped => false,
            FetchOutcome::Loaded(gifts) => {
                self.gifts = gifts;
                self.error = None;
                true
            }
            FetchOutcome::Failed(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn table(&self) -> GiftTable {
        GiftTable::from_gifts(&self.gifts)
    }
}

// ==================== cancelling ====================

#[derive(Debug)]
pub enum CancelOutcome {
    /// Finality observed by polling (or reported by the wallet)
    Confirmed { hash: String },
    /// Fixed settle delay elapsed
    Settled { hash: String },
    /// Submitted, but polling gave up or saw the VM reject it
    Unconfirmed { hash: String, reason: String },
    Failed(WalletError),
}

impl CancelOutcome {
    pub fn hash(&self) -> Option<&str> {
        match self {
            CancelOutcome::Confirmed { hash }
            | CancelOutcome::Settled { hash }
            | CancelOutcome::Unconfirmed { hash, .. } => Some(hash),
            CancelOutcome::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CancelOutcome::Failed(_))
    }

    pub fn summary(&self) -> String {
        match self {
            CancelOutcome::Confirmed { hash } => format!("Gift cancelled (confirmed {})", hash),
            CancelOutcome::Settled { hash } => format!("Gift cancellation submitted ({})", hash),
            CancelOutcome::Unconfirmed { hash, reason } => {
                format!("Cancellation {} not confirmed: {}", hash, reason)
            }
            CancelOutcome::Failed(e) => format!("Cancel failed: {}", e),
        }
    }
}

pub fn cancel_payload(function: &str, recipient: &str) -> Result<EntryFunctionPayload, WalletError> {
    if function.starts_with("::") {
        return Err(WalletError::InvalidPayload("module address is not configured".to_string()));
    }
    if recipient.trim().is_empty() {
        return Err(WalletError::InvalidPayload("recipient address is empty".to_string()));
    }
    Ok(EntryFunctionPayload::new(function, vec![json!(recipient)]))
}

/// Cancel the gift sent to `recipient`.
///
/// Holds the busy flag for the whole call. The flag is not checked first;
/// concurrent cancels on different rows are allowed.
pub async fn cancel_gift(
    wallet: &dyn WalletProvider,
    rpc: &dyn LedgerRpc,
    lock: &OperationLockWriter,
    function: &str,
    recipient: &str,
    policy: ConfirmationPolicy,
) -> CancelOutcome {
    lock.set_busy(true);

    let submitted = match cancel_payload(function, recipient) {
        Ok(payload) => wallet.sign_and_submit(&payload).await,
        Err(e) => Err(e),
    };
    let submitted = match submitted {
        Ok(tx) => tx,
        Err(e) => {
            warn!("Cancel for {} failed before submission completed: {}", recipient, e);
            lock.set_busy(false);
            return CancelOutcome::Failed(e);
        }
    };
    info!("Cancel for {} submitted as {}", recipient, submitted.hash);

    let confirmation = match submitted.committed {
        // the wallet already saw the VM reject it
        Some(false) => Confirmation::Failed {
            vm_status: submitted.vm_status.clone().unwrap_or_else(|| "unknown".to_string()),
        },
        Some(true) if matches!(policy, ConfirmationPolicy::PollForFinality { .. }) => {
            Confirmation::Committed
        }
        _ => await_confirmation(policy, rpc, &submitted).await,
    };

    let hash = submitted.hash;
    let outcome = match confirmation {
        Confirmation::Settled => CancelOutcome::Settled { hash },
        Confirmation::Committed => CancelOutcome::Confirmed { hash },
        Confirmation::Failed { vm_status } => CancelOutcome::Unconfirmed {
            hash,
            reason: format!("transaction failed on chain: {}", vm_status),
        },
        Confirmation::TimedOut => CancelOutcome::Unconfirmed {
            hash,
            reason: "timed out waiting for the transaction to commit".to_string(),
        },
    };

    lock.set_busy(false);
    outcome
}

// ==================== table model ====================

pub const GIFT_TABLE_COLUMNS: usize = 4;
pub const GIFT_TABLE_HEADERS: [&str; GIFT_TABLE_COLUMNS] =
    ["Recipient", "Release date", "Amount", "Cancel gift"];
pub const EMPTY_GIFTS_MESSAGE: &str =
    "You don't have any active gifts. Send a gift to someone to get started!";

/// Display strings for one gift.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftRow {
    pub index: usize,
    pub short_address: String,
    pub full_address: String,
    pub release_date: String,
    pub release_datetime: String,
    pub amount_inline: String,
    pub amount_detail: String,
}

impl GiftRow {
    pub fn from_gift(index: usize, gift: &Gift) -> Self {
        Self {
            index,
            short_address: truncate_address(&gift.address),
            full_address: gift.address.clone(),
            release_date: format_release_date(gift.timestamp),
            release_datetime: format_release_datetime(gift.timestamp),
            amount_inline: format_apt(gift.amount, INLINE_PRECISION),
            amount_detail: format_apt(gift.amount, DETAIL_PRECISION),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GiftTableRow {
    /// Informational row spanning `colspan` columns
    Empty { message: &'static str, colspan: usize },
    Gift(GiftRow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GiftTable {
    pub rows: Vec<GiftTableRow>,
}

impl GiftTable {
    pub fn from_gifts(gifts: &[Gift]) -> Self {
        let rows = if gifts.is_empty() {
            vec![GiftTableRow::Empty {
                message: EMPTY_GIFTS_MESSAGE,
                colspan: GIFT_TABLE_COLUMNS,
            }]
        } else {
            gifts
                .iter()
                .enumerate()
                .map(|(i, g)| GiftTableRow::Gift(GiftRow::from_gift(i, g)))
                .collect()
        };
        Self { rows }
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &GiftRow> {
        self.rows.iter().filter_map(|r| match r {
            GiftTableRow::Gift(row) => Some(row),
            GiftTableRow::Empty { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data_rows().next().is_none()
    }
}
