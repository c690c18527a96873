//! Error types for a single management query
//!
//! A query is one PowerShell invocation against one host. Callers decide
//! whether a failure is fatal (mandatory facts) or degrades to a default.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when running a management query
#[derive(Error, Debug)]
pub enum QueryError {
    /// The PowerShell executable could not be found
    #[error("powershell executable not found: {0}")]
    NotFound(String),

    /// Failed to spawn the PowerShell process
    #[error("failed to spawn powershell process: {0}")]
    SpawnError(#[from] std::io::Error),

    /// The query exited with a non-zero exit code
    #[error("query failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// Exit code from the PowerShell process
        code: i32,
        /// Standard error output
        stderr: String,
    },

    /// The query did not finish in time; the process was killed
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// The query succeeded but printed nothing
    #[error("query returned no data")]
    Empty,

    /// Failed to parse the JSON output
    #[error("failed to parse query output: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type alias for management queries
pub type QueryResult<T> = Result<T, QueryError>;
