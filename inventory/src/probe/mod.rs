//! Per-host fact collection
//!
//! A probe issues a fixed battery of queries against one host:
//!
//! - **Mandatory** (operating system, computer system, processor): any
//!   failure drops the host.
//! - **Service families** (database engine, integration services, reporting
//!   services): each resolves to exactly one [`ServiceStatus`].
//! - **Optional** (BIOS, network, disks): each degrades to "N/A" on its own.

mod cim;
mod client;

pub use cim::CimClient;
pub use client::{ManagementClient, Target};

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use inventory_common::{QueryError, QueryResult};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::classify::{self, VirtualizationDetector};
use crate::config::ServicePatterns;
use crate::types::{InventoryRecord, ServiceFamily, ServiceStatus};

/// The facts a host must answer to produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MandatoryFact {
    OperatingSystem,
    ComputerSystem,
    Processor,
}

impl fmt::Display for MandatoryFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MandatoryFact::OperatingSystem => "operating system",
            MandatoryFact::ComputerSystem => "computer system",
            MandatoryFact::Processor => "processor",
        })
    }
}

/// Why a host produced no record
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{fact} query failed: {source}")]
    Mandatory {
        fact: MandatoryFact,
        #[source]
        source: QueryError,
    },

    #[error("probe timed out after {0:?}")]
    TimedOut(Duration),
}

/// A host that was dropped from the collection
#[derive(Debug)]
pub struct ProbeFailure {
    pub host: String,
    pub cause: ProbeError,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.host, self.cause)
    }
}

/// Queries one host and classifies the answers into an [`InventoryRecord`]
#[derive(Clone)]
pub struct HostProbe {
    client: Arc<dyn ManagementClient>,
    detector: VirtualizationDetector,
    services: ServicePatterns,
}

impl HostProbe {
    pub fn new(
        client: Arc<dyn ManagementClient>,
        detector: VirtualizationDetector,
        services: ServicePatterns,
    ) -> Self {
        Self {
            client,
            detector,
            services,
        }
    }

    /// Probe `target`, computing uptime against `now`.
    ///
    /// Only a mandatory fact can fail the probe. Service and optional
    /// lookups are recovered here and never surface as errors.
    #[instrument(skip(self, now), fields(host = %target.host, local = target.local))]
    pub async fn probe(
        &self,
        target: &Target,
        now: DateTime<Utc>,
    ) -> Result<InventoryRecord, ProbeError> {
        let client = self.client.as_ref();

        let (os, computer, cpu) = tokio::try_join!(
            mandatory(MandatoryFact::OperatingSystem, client.operating_system(target)),
            mandatory(MandatoryFact::ComputerSystem, client.computer_system(target)),
            mandatory(MandatoryFact::Processor, client.processor(target)),
        )?;

        let (engine, integration, reporting, bios, adapters, disks) = tokio::join!(
            self.service_status(target, ServiceFamily::DatabaseEngine),
            self.service_status(target, ServiceFamily::IntegrationServices),
            self.service_status(target, ServiceFamily::ReportingServices),
            optional("bios", client.bios(target)),
            optional("network adapters", client.network_adapters(target)),
            optional("logical disks", client.logical_disks(target)),
        );

        let model = computer.model.unwrap_or_default();
        let is_virtual = self.detector.is_virtual(&model);

        Ok(InventoryRecord {
            host_name: target.host.clone(),
            os_name: os.caption.unwrap_or_default(),
            os_version: os.version.unwrap_or_default(),
            manufacturer: computer.manufacturer.unwrap_or_default(),
            model,
            is_virtual,
            total_physical_memory_bytes: computer.total_physical_memory.unwrap_or(0),
            cpu_name: cpu.name.unwrap_or_default(),
            cpu_core_count: cpu.number_of_cores.unwrap_or(0),
            cpu_logical_processor_count: cpu.number_of_logical_processors.unwrap_or(0),
            sql_database_engine_status: engine,
            sql_integration_services_status: integration,
            sql_reporting_services_status: reporting,
            bios_info: classify::bios_summary(bios.flatten().as_ref()),
            network_info: classify::network_summary(&adapters.unwrap_or_default()),
            disk_summary: classify::disk_summary(&disks.unwrap_or_default()),
            last_boot_time: os.last_boot_up_time,
            uptime_days: classify::uptime_days(os.last_boot_up_time, now),
        })
    }

    async fn service_status(&self, target: &Target, family: ServiceFamily) -> ServiceStatus {
        let lookup = self
            .client
            .services(target, self.services.pattern(family))
            .await;
        if let Err(e) = &lookup {
            debug!(family = family.label(), error = %e, "service lookup failed");
        }
        ServiceStatus::from_lookup(lookup)
    }
}

async fn mandatory<T>(
    fact: MandatoryFact,
    query: impl Future<Output = QueryResult<T>>,
) -> Result<T, ProbeError> {
    query
        .await
        .map_err(|source| ProbeError::Mandatory { fact, source })
}

async fn optional<T>(what: &'static str, query: impl Future<Output = QueryResult<T>>) -> Option<T> {
    match query.await {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(fact = what, error = %e, "optional query failed");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::testing::*;
    use super::*;

    fn now() -> DateTime<Utc> {
        boot_time() + ChronoDuration::hours(60)
    }

    #[tokio::test]
    async fn test_healthy_host_builds_full_record() {
        let client = FakeClient::default().with_host(
            "SQL01",
            FakeHost::healthy("VMware7,1")
                .with_service("MSSQL*", "MSSQLSERVER", "Running")
                .with_service("MsDtsServer*", "MsDtsServer160", "Stopped"),
        );
        let probe = probe_for(client);

        let record = probe.probe(&Target::remote("SQL01"), now()).await.unwrap();

        assert_eq!(record.host_name, "SQL01");
        assert_eq!(record.os_version, "10.0.20348");
        assert!(record.is_virtual);
        assert_eq!(record.total_physical_memory_bytes, 17_179_869_184);
        assert_eq!(record.cpu_core_count, 8);
        assert_eq!(
            record.sql_database_engine_status,
            ServiceStatus::Running(vec!["MSSQLSERVER".to_string()])
        );
        assert_eq!(record.sql_integration_services_status, ServiceStatus::InstalledNotRunning);
        assert_eq!(record.sql_reporting_services_status, ServiceStatus::NotFound);
        assert_eq!(record.bios_info, "Manufacturer: Contoso, Version: 1.2.3");
        assert_eq!(record.network_info, "IP: 10.0.0.5, MAC: AA:BB:CC:DD:EE:FF");
        assert_eq!(record.disk_summary, "C: 50.0GB free of 100.0GB");
        assert_eq!(record.uptime_days, 2.5);
    }

    #[tokio::test]
    async fn test_optional_failures_degrade_to_na() {
        let mut host = FakeHost::healthy("PowerEdge R740");
        host.bios = None;
        host.adapters = Some(Vec::new());
        host.disks = None;
        let probe = probe_for(FakeClient::default().with_host("WS-01", host));

        let record = probe.probe(&Target::remote("WS-01"), now()).await.unwrap();

        assert!(!record.is_virtual);
        assert_eq!(record.bios_info, "N/A");
        assert_eq!(record.network_info, "N/A");
        assert_eq!(record.disk_summary, "N/A");
    }

    #[tokio::test]
    async fn test_empty_bios_is_na() {
        let mut host = FakeHost::healthy("PowerEdge R740");
        host.bios = Some(None);
        let probe = probe_for(FakeClient::default().with_host("WS-01", host));

        let record = probe.probe(&Target::remote("WS-01"), now()).await.unwrap();
        assert_eq!(record.bios_info, "N/A");
    }

    #[tokio::test]
    async fn test_mandatory_failure_fails_probe() {
        let mut host = FakeHost::healthy("PowerEdge R740");
        host.cpu = None;
        let probe = probe_for(FakeClient::default().with_host("WS-01", host));

        let err = probe.probe(&Target::remote("WS-01"), now()).await.unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Mandatory {
                fact: MandatoryFact::Processor,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_probe() {
        let probe = probe_for(FakeClient::default());
        let result = probe.probe(&Target::remote("GHOST"), now()).await;
        assert!(matches!(result, Err(ProbeError::Mandatory { .. })));
    }

    #[tokio::test]
    async fn test_service_statuses_never_absent() {
        let probe = probe_for(FakeClient::default().with_host("WS-01", FakeHost::healthy("X")));
        let record = probe.probe(&Target::new("WS-01", true), now()).await.unwrap();
        for status in [
            &record.sql_database_engine_status,
            &record.sql_integration_services_status,
            &record.sql_reporting_services_status,
        ] {
            assert_eq!(status, &ServiceStatus::NotFound);
        }
    }
}
