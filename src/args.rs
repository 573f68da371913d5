use camino::Utf8PathBuf;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use url::Url;

use verifier::api::{PollPolicy, DEFAULT_API_URL};

fn get_network_validation_regex() -> Result<&'static Regex, String> {
    lazy_static! {
        static ref VALID_NETWORK_REGEX: Result<Regex, regex::Error> =
            Regex::new(r"^[a-zA-Z0-9_-]+$");
    }

    match VALID_NETWORK_REGEX.as_ref() {
        Ok(regex) => Ok(regex),
        Err(_) => Err("Internal regex compilation error".to_string()),
    }
}

fn network_name_value_parser(name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("Network name cannot be empty".to_string());
    }

    let re = get_network_validation_regex()?;
    if !re.is_match(name) {
        return Err(format!(
            "Network name '{name}' can only contain letters, digits, '-' and '_'"
        ));
    }

    Ok(name.to_string())
}

#[derive(clap::Parser)]
#[command(name = "verify-bscscan")]
#[command(version)]
#[command(about = "Verify deployed contracts on BscScan")]
#[command(long_about = "
Submits every contract registered for a network to BscScan for source
verification. Contracts that are already verified are reported as such and
never count as failures; a failing contract doesn't stop the others.

Examples:
  # Verify everything registered for BSC testnet
  verify-bscscan verify --network bscTestnet

  # Use a registry file instead of the built-in table
  verify-bscscan verify --network bsc --registry verify.toml

  # Check a submission by its GUID
  verify-bscscan status --network bscTestnet --guid ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn

  # Show registered contracts
  verify-bscscan list
")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Verify all contracts registered for a network
    ///
    /// Attempts every registry entry of the network in order and prints a
    /// line per contract followed by a verified/total summary. Exits with
    /// an error only if the network isn't in the registry.
    Verify(VerifyArgs),

    /// Check the status of a submitted verification
    Status(StatusArgs),

    /// List networks and contracts in the registry
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct RegistryArgs {
    /// TOML registry file (default: built-in table)
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub registry: Option<Utf8PathBuf>,
}

#[derive(clap::Args)]
pub struct ExplorerArgs {
    /// Explorer API key
    #[arg(long, env = "BSCSCAN_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Etherscan-compatible API endpoint
    #[arg(
        long,
        value_name = "URL",
        value_hint = clap::ValueHint::Url,
        value_parser = Url::parse,
        default_value = DEFAULT_API_URL
    )]
    pub api_url: Url,

    /// Chain id sent to the API (default: derived from the network)
    #[arg(long, value_name = "ID")]
    pub chain_id: Option<u64>,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Network whose contracts to verify (e.g. bsc, bscTestnet)
    #[arg(long, env = "HARDHAT_NETWORK", value_parser = network_name_value_parser)]
    pub network: String,

    #[command(flatten)]
    pub registry: RegistryArgs,

    #[command(flatten)]
    pub explorer: ExplorerArgs,

    /// Directory holding Hardhat build info files
    #[arg(
        long,
        value_name = "DIR",
        value_hint = clap::ValueHint::DirPath,
        default_value = "artifacts/build-info"
    )]
    pub build_info: Utf8PathBuf,

    /// Report accepted submissions without waiting for the explorer's verdict
    #[arg(long, default_value_t = false)]
    pub no_wait: bool,

    /// Maximum number of status checks per submission
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub max_polls: usize,
}

impl VerifyArgs {
    pub fn poll_policy(&self) -> Option<PollPolicy> {
        (!self.no_wait).then(|| PollPolicy {
            max_polls: self.max_polls,
            ..PollPolicy::default()
        })
    }
}

#[derive(clap::Args)]
pub struct StatusArgs {
    /// Network the submission was made on
    #[arg(long, env = "HARDHAT_NETWORK", value_parser = network_name_value_parser)]
    pub network: String,

    #[command(flatten)]
    pub explorer: ExplorerArgs,

    /// GUID returned when the contract was submitted
    #[arg(long, value_name = "GUID")]
    pub guid: String,

    /// Keep checking until the explorer reaches a verdict
    #[arg(long, default_value_t = false)]
    pub watch: bool,
}

impl StatusArgs {
    /// `None` checks once and reports whatever state the job is in.
    pub fn poll_policy(&self) -> Option<PollPolicy> {
        self.watch.then(|| PollPolicy {
            max_polls: 20,
            max_delay: Duration::from_secs(60),
            ..PollPolicy::default()
        })
    }
}

#[derive(clap::Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_verify_args() {
        let args = Args::try_parse_from([
            "verify-bscscan",
            "verify",
            "--network",
            "bscTestnet",
            "--api-key",
            "KEY",
            "--no-wait",
        ])
        .unwrap();

        let Commands::Verify(verify) = args.command else {
            panic!("Expected verify command");
        };
        assert_eq!(verify.network, "bscTestnet");
        assert_eq!(verify.explorer.api_key, "KEY");
        assert_eq!(verify.explorer.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(verify.build_info, Utf8PathBuf::from("artifacts/build-info"));
        assert!(verify.registry.registry.is_none());
        assert!(verify.poll_policy().is_none());
    }

    #[test]
    fn test_rejects_network_with_whitespace() {
        let result = Args::try_parse_from([
            "verify-bscscan",
            "verify",
            "--network",
            "bsc testnet",
            "--api-key",
            "KEY",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_without_watch_checks_once() {
        let args = Args::try_parse_from([
            "verify-bscscan",
            "status",
            "--network",
            "bsc",
            "--api-key",
            "KEY",
            "--guid",
            "abc",
        ])
        .unwrap();

        let Commands::Status(status) = args.command else {
            panic!("Expected status command");
        };
        assert!(status.poll_policy().is_none());
    }

    #[test]
    fn test_status_watch_polls() {
        let args = Args::try_parse_from([
            "verify-bscscan",
            "status",
            "--network",
            "bsc",
            "--api-key",
            "KEY",
            "--guid",
            "abc",
            "--watch",
        ])
        .unwrap();

        let Commands::Status(status) = args.command else {
            panic!("Expected status command");
        };
        assert_eq!(status.poll_policy().map(|p| p.max_polls), Some(20));
    }

    #[test]
    fn test_list_needs_no_api_key() {
        let args = Args::try_parse_from(["verify-bscscan", "list", "--registry", "verify.toml"]);
        assert!(args.is_ok());
    }
}
