use std::path::PathBuf;

use clap::Parser;
use host_inventory::{Config, HostSource};

#[derive(Parser, Debug)]
#[command(name = "host-inventory")]
#[command(about = "Inventory local, directory and cloud-directory hosts into HTML and CSV reports")]
#[command(version)]
pub struct Cli {
    /// Directory server to enumerate computer objects from
    #[arg(long, env = "INVENTORY_DIRECTORY_SERVER")]
    pub directory_server: Option<String>,

    /// Also inventory devices registered in the cloud directory
    #[arg(long)]
    pub cloud: bool,

    /// Config file (default: search ./host-inventory.toml, then the user config dir)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Directory for the generated reports
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Hosts probed at the same time within a category
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-host probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Probe each host name once (case-insensitive)
    #[arg(long)]
    pub dedupe: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.probe.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout;
        }
        if self.dedupe {
            config.probe.dedupe_hosts = true;
        }
    }

    /// Local always runs; the others only when asked for
    pub fn sources(&self) -> Vec<HostSource> {
        let mut sources = vec![HostSource::Local];
        if let Some(server) = &self.directory_server {
            sources.push(HostSource::Directory {
                server: server.clone(),
            });
        }
        if self.cloud {
            sources.push(HostSource::CloudDirectory);
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_only_by_default() {
        let cli = Cli::parse_from(["host-inventory"]);
        assert_eq!(cli.sources(), vec![HostSource::Local]);
    }

    #[test]
    fn test_all_sources() {
        let cli = Cli::parse_from(["host-inventory", "--directory-server", "dc01", "--cloud"]);
        assert_eq!(
            cli.sources(),
            vec![
                HostSource::Local,
                HostSource::Directory {
                    server: "dc01".into()
                },
                HostSource::CloudDirectory,
            ]
        );
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "host-inventory",
            "--output-dir",
            "/tmp/reports",
            "--concurrency",
            "2",
            "--timeout",
            "30",
            "--dedupe",
            "-vv",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.output.directory, PathBuf::from("/tmp/reports"));
        assert_eq!(config.probe.concurrency, 2);
        assert_eq!(config.probe.timeout_secs, 30);
        assert!(config.probe.dedupe_hosts);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let cli = Cli::parse_from(["host-inventory"]);
        let mut config = Config::default();
        config.probe.dedupe_hosts = true;
        cli.apply(&mut config);
        assert!(config.probe.dedupe_hosts);
        assert_eq!(config.probe.concurrency, 8);
    }
}
