//! Wallet backend driven by the `aptos` CLI.
//! Reads the account from a CLI profile and submits entry functions with `aptos move run`.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{error, info, warn};

use super::{WalletProvider, WalletStatus};
use crate::error::WalletError;
use crate::types::{EntryFunctionPayload, SubmittedTransaction};
use crate::units::normalize_address;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// `move run` waits for commit, so this is generous
const CLI_TIMEOUT_SECS: u64 = 120;

/// Cached path to the aptos executable
static APTOS_PATH: OnceLock<String> = OnceLock::new();

/// Find the aptos executable, checking common installation paths if not in PATH.
/// The result is cached for subsequent calls.
pub fn get_aptos_path() -> &'static str {
    APTOS_PATH.get_or_init(|| {
        if is_aptos_available("aptos") {
            info!("Found aptos in PATH");
            return "aptos".to_string();
        }

        for dir in candidate_dirs() {
            let path = dir.join(if cfg!(windows) { "aptos.exe" } else { "aptos" });
            if path.exists() {
                let path_str = path.to_string_lossy().to_string();
                if is_aptos_available(&path_str) {
                    info!("Found aptos at: {}", path_str);
                    return path_str;
                }
            }
        }

        warn!("aptos not found in PATH or common locations, falling back to 'aptos'");
        "aptos".to_string()
    })
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        // install script default
        paths.push(home.join(".local").join("bin"));
        paths.push(home.join(".aptoscli").join("bin"));
    }
    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            paths.push(local_app_data.join("aptoscli"));
        }
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.to_path_buf());
        }
    }
    paths
}

fn is_aptos_available(path: &str) -> bool {
    let mut cmd = std::process::Command::new(path);
    cmd.arg("--version");

    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);

    cmd.output().map(|o| o.status.success()).unwrap_or(false)
}

/// Unwrap the CLI's `{"Result": ...}` / `{"Error": "..."}` envelope.
pub fn parse_cli_output(stdout: &str) -> Result<serde_json::Value, WalletError> {
    let value: serde_json::Value = serde_json::from_str(stdout.trim())
        .map_err(|e| WalletError::CliFailed(format!("unreadable CLI output: {}", e)))?;

    if let Some(result) = value.get("Result") {
        return Ok(result.clone());
    }
    let message = value
        .get("Error")
        .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
        .unwrap_or_else(|| value.to_string());

    if message.contains("Move abort")
        || message.contains("INSUFFICIENT_BALANCE")
        || message.contains("SEQUENCE_NUMBER")
        || message.contains("Aborted")
    {
        Err(WalletError::Rejected(message))
    } else {
        Err(WalletError::CliFailed(message))
    }
}

/// Render a JSON argument in the CLI's `type:value` syntax.
pub fn cli_arg(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) if s.starts_with("0x") => format!("address:{}", s),
        serde_json::Value::String(s) => format!("string:{}", s),
        serde_json::Value::Number(n) => format!("u64:{}", n),
        serde_json::Value::Bool(b) => format!("bool:{}", b),
        other => format!("string:{}", other),
    }
}

fn submitted_from_result(result: &serde_json::Value) -> Result<SubmittedTransaction, WalletError> {
    let hash = result
        .get("transaction_hash")
        .and_then(|h| h.as_str())
        .ok_or_else(|| WalletError::CliFailed("no transaction_hash in CLI output".to_string()))?;
    let success = result.get("success").and_then(|s| s.as_bool());
    let vm_status = result.get("vm_status").and_then(|s| s.as_str()).map(str::to_string);
    if success == Some(false) {
        warn!(
            "Transaction {} committed but failed: {}",
            hash,
            vm_status.as_deref().unwrap_or("unknown")
        );
    }
    Ok(SubmittedTransaction {
        hash: hash.to_string(),
        committed: success,
        vm_status,
    })
}

pub struct AptosCliWallet {
    profile: String,
    node_url: String,
}

impl AptosCliWallet {
    pub fn new(profile: String, node_url: String) -> Self {
        Self { profile, node_url }
    }

    async fn run(&self, args: &[String]) -> Result<serde_json::Value, WalletError> {
        let _lock = crate::wallet_lock::wallet_lock().lock().await;

        let mut command = Command::new(get_aptos_path());
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WalletError::CliNotFound
            } else {
                WalletError::CliFailed(format!("failed to run aptos: {}", e))
            }
        })?;

        let mut child_stdout = child
            .stdout
            .take()
            .ok_or_else(|| WalletError::CliFailed("failed to capture stdout".to_string()))?;
        let mut child_stderr = child
            .stderr
            .take()
            .ok_or_else(|| WalletError::CliFailed("failed to capture stderr".to_string()))?;

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            child_stdout.read_to_end(&mut buf).await.map(|_| buf)
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            child_stderr.read_to_end(&mut buf).await.map(|_| buf)
        });

        let status = match tokio::time::timeout(Duration::from_secs(CLI_TIMEOUT_SECS), child.wait()).await {
            Ok(res) => res.map_err(|e| WalletError::CliFailed(e.to_string()))?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(WalletError::Timeout(CLI_TIMEOUT_SECS));
            }
        };

        let stdout = stdout_task
            .await
            .map_err(|e| WalletError::CliFailed(format!("stdout task join error: {}", e)))?
            .map_err(|e| WalletError::CliFailed(e.to_string()))?;
        let stderr = stderr_task
            .await
            .map_err(|e| WalletError::CliFailed(format!("stderr task join error: {}", e)))?
            .map_err(|e| WalletError::CliFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&stdout);
        // The CLI prints its JSON envelope on stdout even when it exits non-zero.
        if !stdout.trim().is_empty() {
            return parse_cli_output(&stdout);
        }
        let stderr = String::from_utf8_lossy(&stderr);
        error!("aptos exited with {}: {}", status, stderr.trim());
        Err(WalletError::CliFailed(stderr.trim().to_string()))
    }
}

#[async_trait]
impl WalletProvider for AptosCliWallet {
    async fn status(&self) -> WalletStatus {
        if !is_aptos_available(get_aptos_path()) {
            return WalletStatus::Unknown("aptos CLI not found".to_string());
        }
        let args = vec![
            "config".to_string(),
            "show-profiles".to_string(),
            "--profile".to_string(),
            self.profile.clone(),
        ];
        match self.run(&args).await {
            Ok(result) => match result
                .get(&self.profile)
                .and_then(|p| p.get("account"))
                .and_then(|a| a.as_str())
            {
                Some(account) => WalletStatus::Connected {
                    address: normalize_address(account),
                },
                None => WalletStatus::Disconnected,
            },
            Err(WalletError::CliFailed(msg)) if msg.contains("does not exist") => {
                WalletStatus::Disconnected
            }
            Err(e) => WalletStatus::Unknown(e.to_string().chars().take(40).collect()),
        }
    }

    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<SubmittedTransaction, WalletError> {
        let mut args = vec![
            "move".to_string(),
            "run".to_string(),
            "--function-id".to_string(),
            payload.function.clone(),
        ];
        if !payload.type_arguments.is_empty() {
            args.push("--type-args".to_string());
            args.extend(payload.type_arguments.iter().cloned());
        }
        if !payload.arguments.is_empty() {
            args.push("--args".to_string());
            args.extend(payload.arguments.iter().map(cli_arg));
        }
        args.extend([
            "--profile".to_string(),
            self.profile.clone(),
            "--url".to_string(),
            self.node_url.clone(),
            "--assume-yes".to_string(),
        ]);

        info!("Submitting {} via aptos CLI", payload.function);
        let result = self.run(&args).await?;
        submitted_from_result(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== parse_cli_output tests ====================

    #[test]
    fn test_parse_cli_output_result() {
        let out = r#"{"Result": {"default": {"account": "abcd"}}}"#;
        let value = parse_cli_output(out).unwrap();
        assert_eq!(value["default"]["account"], "abcd");
    }

    #[test]
    fn test_parse_cli_output_error() {
        let out = r#"{"Error": "Unable to find config, have you run `aptos init`?"}"#;
        match parse_cli_output(out) {
            Err(WalletError::CliFailed(msg)) => assert!(msg.contains("aptos init")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_cli_output_move_abort_is_rejection() {
        let out = r#"{"Error": "Simulation failed with status: Move abort in 0xcafe::birthday_bot: 0x1"}"#;
        assert!(matches!(parse_cli_output(out), Err(WalletError::Rejected(_))));
    }

    #[test]
    fn test_parse_cli_output_garbage() {
        assert!(matches!(
            parse_cli_output("Do you want to submit a transaction?"),
            Err(WalletError::CliFailed(_))
        ));
    }

    // ==================== cli_arg tests ====================

    #[test]
    fn test_cli_arg_address() {
        assert_eq!(cli_arg(&json!("0xbeef")), "address:0xbeef");
    }

    #[test]
    fn test_cli_arg_other_types() {
        assert_eq!(cli_arg(&json!("hello")), "string:hello");
        assert_eq!(cli_arg(&json!(42)), "u64:42");
        assert_eq!(cli_arg(&json!(true)), "bool:true");
    }

    // ==================== submitted_from_result tests ====================

    #[test]
    fn test_submitted_from_result_success() {
        let result = json!({"transaction_hash": "0xfeed", "success": true, "vm_status": "Executed successfully"});
        let tx = submitted_from_result(&result).unwrap();
        assert_eq!(tx.hash, "0xfeed");
        assert_eq!(tx.committed, Some(true));
    }

    #[test]
    fn test_submitted_from_result_vm_failure_is_still_submitted() {
        let result = json!({"transaction_hash": "0xfeed", "success": false, "vm_status": "Move abort"});
        let tx = submitted_from_result(&result).unwrap();
        assert_eq!(tx.hash, "0xfeed");
        assert_eq!(tx.committed, Some(false));
        assert_eq!(tx.vm_status.as_deref(), Some("Move abort"));
    }

    #[test]
    fn test_submitted_from_result_missing_hash() {
        assert!(submitted_from_result(&json!({"success": true})).is_err());
    }
}
