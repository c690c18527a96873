//! Inventory Common - Shared utilities for the host inventory tools
//!
//! This crate provides the plumbing shared by the probe backend and the
//! host enumeration sources:
//!
//! - **Initialization**: [`init_tracing`] for standardized logging setup
//! - **Execution**: [`PowerShell`] runs one CIM/AD query per process with a
//!   bounded timeout and parses its JSON output
//! - **Errors**: [`QueryError`] describes why a single query failed
//!
//! # Example
//!
//! ```rust,ignore
//! use inventory_common::{PowerShell, OneOrMany};
//! use std::time::Duration;
//!
//! let ps = PowerShell::new("pwsh", Duration::from_secs(30));
//! let names: OneOrMany<String> = ps
//!     .run_json("Get-ADComputer -Filter * | Select-Object -ExpandProperty Name | ConvertTo-Json -Compress")
//!     .await?;
//! ```

pub mod error;
pub mod init;
pub mod powershell;

pub use error::{QueryError, QueryResult};
pub use init::{init_tracing, level_for_verbosity};
pub use powershell::{quote, OneOrMany, PowerShell};
