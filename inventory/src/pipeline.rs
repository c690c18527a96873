//! One category, end to end: enumerate, collect, render, write.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use inventory_common::PowerShell;
use tracing::{info, warn};

use crate::collector::{InventoryCollection, InventoryCollector};
use crate::report::{self, Destinations, RenderError};
use crate::sources::HostSource;
use crate::types::Category;

/// What one category produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub category: Category,
    pub attempted: usize,
    pub records: usize,
    pub failures: usize,
    /// Files written, document first
    pub written: Vec<PathBuf>,
}

/// Shared pieces for running any category
#[derive(Clone)]
pub struct Pipeline {
    collector: InventoryCollector,
    source_shell: PowerShell,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        collector: InventoryCollector,
        source_shell: PowerShell,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            collector,
            source_shell,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Executable used for enumeration queries
    pub fn shell(&self) -> &str {
        self.source_shell.executable()
    }

    /// Run `source` to completion.
    ///
    /// An unavailable source skips the category (`Ok(None)`) and writes
    /// nothing. Only rendering or writing can fail the category.
    pub async fn run(&self, source: &HostSource) -> Result<Option<CategoryOutcome>, RenderError> {
        let category = source.category();
        let hosts = match source.enumerate(&self.source_shell).await {
            Ok(hosts) => hosts,
            Err(e) => {
                warn!(%category, error = %e, "skipping category");
                return Ok(None);
            }
        };
        self.run_hosts(category, hosts).await.map(Some)
    }

    /// Collect and publish an already enumerated host list
    pub async fn run_hosts(
        &self,
        category: Category,
        hosts: Vec<String>,
    ) -> Result<CategoryOutcome, RenderError> {
        let collection = self.collector.collect(hosts, category).await;
        let written = publish(&collection, &self.output_dir, Utc::now())?;

        Ok(CategoryOutcome {
            category,
            attempted: collection.attempted(),
            records: collection.records.len(),
            failures: collection.failures.len(),
            written,
        })
    }
}

/// Render `collection` and write it under `output_dir`
pub fn publish(
    collection: &InventoryCollection,
    output_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<Vec<PathBuf>, RenderError> {
    let category = collection.category;
    let rendered = report::render(&collection.records, category.title(), generated_at)?;

    std::fs::create_dir_all(output_dir).map_err(|source| RenderError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let destinations = Destinations::in_dir(output_dir, category.slug());
    let written = report::write_outputs(&rendered, &destinations)?;

    info!(
        %category,
        records = collection.records.len(),
        document = %written[0].display(),
        "report written"
    );
    Ok(written)
}
