//! Async executor for PowerShell queries
//!
//! Every query runs in its own PowerShell process. The process is the
//! query's session: it is killed when the future driving it is dropped, so a
//! timeout (here or in a caller) never leaves a stray session behind.

use std::process::Stdio;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::{QueryError, QueryResult};

/// Prepended to every script so non-terminating errors fail the process.
const PRELUDE: &str = "$ErrorActionPreference = 'Stop'; $ProgressPreference = 'SilentlyContinue'; ";

/// A PowerShell executable plus the timeout applied to each invocation
#[derive(Debug, Clone)]
pub struct PowerShell {
    executable: String,
    timeout: Duration,
}

impl PowerShell {
    pub fn new(executable: impl Into<String>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Run a script and return its trimmed stdout
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The executable cannot be spawned
    /// - The script exits with non-zero status
    /// - The script does not finish within the configured timeout
    #[instrument(skip_all, fields(exe = %self.executable))]
    pub async fn run_raw(&self, script: &str) -> QueryResult<String> {
        debug!(script, "executing powershell query");

        let child = Command::new(&self.executable)
            .args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(format!("{PRELUDE}{script}"))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    QueryError::NotFound(self.executable.clone())
                } else {
                    QueryError::SpawnError(e)
                }
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            // The child is dropped with the future and killed
            Err(_elapsed) => return Err(QueryError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            warn!(code, stderr = %stderr, "powershell query failed");
            return Err(QueryError::CommandFailed { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a script that ends in `ConvertTo-Json` and parse its output
    ///
    /// Empty output is reported as [`QueryError::Empty`]; callers that treat
    /// "no objects" as a valid answer should map that variant themselves.
    pub async fn run_json<T: DeserializeOwned>(&self, script: &str) -> QueryResult<T> {
        let stdout = self.run_raw(script).await?;
        if stdout.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(serde_json::from_str(&stdout)?)
    }
}

/// `ConvertTo-Json` emits a bare object for a single result and an array
/// for several. This accepts both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Quote a value as a PowerShell single-quoted string literal
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
