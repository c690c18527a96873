//! The management query interface consumed by the probe

use std::fmt;

use async_trait::async_trait;
use inventory_common::QueryResult;

use crate::types::{
    BiosFacts, ComputerSystemFacts, LogicalDiskFacts, NetworkAdapterFacts, OperatingSystemFacts,
    ProcessorFacts, ServiceFacts,
};

/// The host a probe runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    /// Query the running machine directly instead of over a remote session
    pub local: bool,
}

impl Target {
    pub fn new(host: impl Into<String>, local: bool) -> Self {
        Self {
            host: host.into(),
            local,
        }
    }

    pub fn remote(host: impl Into<String>) -> Self {
        Self::new(host, false)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.local {
            write!(f, "{} (local)", self.host)
        } else {
            f.write_str(&self.host)
        }
    }
}

/// One method per fact family. Every method fails independently; the probe
/// decides which failures are fatal.
///
/// Implementations must be `Send + Sync`: one client is shared by every
/// concurrent probe in a run.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    async fn operating_system(&self, target: &Target) -> QueryResult<OperatingSystemFacts>;

    async fn computer_system(&self, target: &Target) -> QueryResult<ComputerSystemFacts>;

    /// All sockets folded into one row
    async fn processor(&self, target: &Target) -> QueryResult<ProcessorFacts>;

    /// `Ok(None)` when the class answered with no instance
    async fn bios(&self, target: &Target) -> QueryResult<Option<BiosFacts>>;

    /// Every adapter configuration, in the order the host enumerates them
    async fn network_adapters(&self, target: &Target) -> QueryResult<Vec<NetworkAdapterFacts>>;

    /// Fixed local disks only
    async fn logical_disks(&self, target: &Target) -> QueryResult<Vec<LogicalDiskFacts>>;

    /// Services whose name matches `pattern` (`*` wildcard). An error means
    /// the lookup itself failed, which includes "nothing matched".
    async fn services(&self, target: &Target, pattern: &str) -> QueryResult<Vec<ServiceFacts>>;
}
