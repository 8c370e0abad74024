use std::sync::OnceLock;
use tokio::sync::Mutex;

/// Global mutex to serialize wallet access.
///
/// Both backends sign from the same account, so two submissions racing for the
/// same sequence number would make one of them fail. The `aptos` CLI also
/// rewrites its profile config on some commands.
static WALLET_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn wallet_lock() -> &'static Mutex<()> {
    WALLET_LOCK.get_or_init(|| Mutex::new(()))
}
