//! Host Inventory Library
//!
//! Collects hardware and software facts from hosts drawn from up to three
//! sources (the local machine, an on-premises directory, a cloud directory)
//! and publishes one HTML report plus one CSV export per source.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use host_inventory::{CimClient, Config, HostProbe, InventoryCollector, VirtualizationDetector};
//! use inventory_common::PowerShell;
//!
//! let config = Config::default();
//! let ps = PowerShell::new("pwsh", Duration::from_secs(60));
//! let probe = HostProbe::new(
//!     Arc::new(CimClient::new(ps)),
//!     VirtualizationDetector::new(&config.classifier.virtual_indicators),
//!     config.services.clone(),
//! );
//! let collection = InventoryCollector::new(probe, config.probe.timeout(), 8)
//!     .collect(vec!["SRV01".into()], host_inventory::Category::Directory)
//!     .await;
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `host-inventory --directory-server dc01 --cloud`

pub mod classify;
pub mod collector;
pub mod config;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod sources;
pub mod types;

// Re-export the pipeline building blocks
pub use classify::VirtualizationDetector;
pub use collector::{InventoryCollection, InventoryCollector};
pub use config::Config;
pub use pipeline::{CategoryOutcome, Pipeline};
pub use probe::{CimClient, HostProbe, ManagementClient, ProbeError, Target};
pub use report::{render, RenderError, Rendered};
pub use sources::{HostSource, SourceError};
pub use types::{Category, InventoryRecord, ServiceStatus};
