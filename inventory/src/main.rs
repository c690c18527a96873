//! Host Inventory
//!
//! Probes every host from the selected sources and writes
//! `<category>_inventory.html` and `<category>_inventory.csv` per category.
//!
//! # Usage
//!
//! ```text
//! host-inventory [--directory-server <addr>] [--cloud] [--output-dir <dir>]
//! ```

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;
use inventory_common::{init_tracing, PowerShell};
use tracing::{error, info};

use host_inventory::{
    CimClient, Config, HostProbe, InventoryCollector, Pipeline, VirtualizationDetector,
};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&["host_inventory", "inventory_common"], cli.verbose)?;

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    let query_shell = PowerShell::new(
        config.powershell.executable.clone(),
        config.powershell.query_timeout(),
    );
    let source_shell = PowerShell::new(
        config.powershell.executable.clone(),
        config.powershell.source_timeout(),
    );

    let probe = HostProbe::new(
        Arc::new(CimClient::new(query_shell)),
        VirtualizationDetector::new(&config.classifier.virtual_indicators),
        config.services.clone(),
    );
    let collector = InventoryCollector::new(probe, config.probe.timeout(), config.probe.concurrency)
        .with_dedupe(config.probe.dedupe_hosts);
    let pipeline = Pipeline::new(collector, source_shell, config.output.directory.clone());

    let sources = cli.sources();
    info!(
        categories = sources.len(),
        shell = pipeline.shell(),
        output = %pipeline.output_dir().display(),
        "starting inventory"
    );

    let results = join_all(sources.iter().map(|source| pipeline.run(source))).await;

    let mut render_failed = false;
    for (source, result) in sources.iter().zip(results) {
        let category = source.category();
        match result {
            Ok(Some(outcome)) => {
                info!(
                    %category,
                    attempted = outcome.attempted,
                    records = outcome.records,
                    failures = outcome.failures,
                    "category complete"
                );
                println!(
                    "{}: {} of {} hosts inventoried, {} failed -> {}",
                    category,
                    outcome.records,
                    outcome.attempted,
                    outcome.failures,
                    outcome
                        .written
                        .first()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                );
            }
            Ok(None) => println!("{}: skipped (source unavailable)", category),
            Err(e) => {
                error!(%category, error = %e, "report failed");
                render_failed = true;
            }
        }
    }

    Ok(if render_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
