//! Batch collection across a host list
//!
//! Probes run concurrently up to a bound, each under its own timeout. A slot
//! frees as soon as its probe finishes, whatever the hosts ahead of it are
//! doing. Results carry their input index and are sorted back into input
//! order, so the same host list always yields the same record order.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::probe::{HostProbe, ProbeError, ProbeFailure, Target};
use crate::types::{Category, InventoryRecord};

/// Outcome of collecting one category
#[derive(Debug)]
pub struct InventoryCollection {
    pub category: Category,
    /// Successful hosts, in input order
    pub records: Vec<InventoryRecord>,
    /// Hosts that produced no record
    pub failures: Vec<ProbeFailure>,
}

impl InventoryCollection {
    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Drives a [`HostProbe`] over a host list
#[derive(Clone)]
pub struct InventoryCollector {
    probe: HostProbe,
    timeout: Duration,
    concurrency: usize,
    dedupe: bool,
}

impl InventoryCollector {
    pub fn new(probe: HostProbe, timeout: Duration, concurrency: usize) -> Self {
        Self {
            probe,
            timeout,
            concurrency: concurrency.max(1),
            dedupe: false,
        }
    }

    /// Drop repeated host names before probing
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Probe every host once. Failures are logged and kept aside; they never
    /// stop the batch and are not retried.
    pub async fn collect(&self, hosts: Vec<String>, category: Category) -> InventoryCollection {
        let hosts = if self.dedupe {
            dedupe_hosts(hosts)
        } else {
            hosts
        };
        let local = category.is_local();

        info!(
            %category,
            hosts = hosts.len(),
            concurrency = self.concurrency,
            "collecting inventory"
        );

        let mut results: Vec<(usize, String, Result<InventoryRecord, ProbeError>)> =
            stream::iter(hosts.into_iter().enumerate())
                .map(|(index, host)| async move {
                    let target = Target::new(host, local);
                    let result = self.probe_with_timeout(&target).await;
                    (index, target.host, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        results.sort_unstable_by_key(|(index, _, _)| *index);

        let mut records = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (_, host, result) in results {
            match result {
                Ok(record) => records.push(record),
                Err(cause) => {
                    warn!(%category, host = %host, error = %cause, "host skipped");
                    failures.push(ProbeFailure { host, cause });
                }
            }
        }

        info!(
            %category,
            collected = records.len(),
            failed = failures.len(),
            "collection finished"
        );

        InventoryCollection {
            category,
            records,
            failures,
        }
    }

    async fn probe_with_timeout(&self, target: &Target) -> Result<InventoryRecord, ProbeError> {
        // Dropping the probe future on timeout kills its query processes
        match tokio::time::timeout(self.timeout, self.probe.probe(target, Utc::now())).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ProbeError::TimedOut(self.timeout)),
        }
    }
}

/// Keep the first occurrence of each host name, compared case-insensitively
pub fn dedupe_hosts(hosts: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    hosts
        .into_iter()
        .filter(|h| seen.insert(h.to_lowercase()))
        .collect()
}
