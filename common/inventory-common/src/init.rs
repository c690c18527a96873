//! Tracing initialization
//!
//! Provides standardized tracing setup for the inventory binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to the default level for our own crates.
///
/// 0 => warn, 1 => info, 2 => debug, 3+ => trace
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing/logging
///
/// Sets up logging to stderr (stdout stays free for the final summary) with:
/// - Environment-based filtering via RUST_LOG
/// - A default level for each crate in `crate_names`, chosen from `verbose`
///
/// Set `LOG_FORMAT=json` for structured JSON output (useful when the run is
/// scheduled and its logs are shipped somewhere). Default is human-readable text.
///
/// # Example
///
/// ```rust,ignore
/// inventory_common::init_tracing(&["host_inventory", "inventory_common"], 1)?;
/// ```
pub fn init_tracing(crate_names: &[&str], verbose: u8) -> anyhow::Result<()> {
    let level = level_for_verbosity(verbose);
    let mut filter = EnvFilter::from_default_env();
    for name in crate_names {
        filter = filter.add_directive(format!("{}={}", name, level).parse()?);
    }

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}
