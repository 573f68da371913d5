mod args;
mod progress;

use crate::args::{Args, Commands, ExplorerArgs, ListArgs, RegistryArgs, StatusArgs, VerifyArgs};
use crate::progress::WithProgress;

use clap::Parser;
use itertools::Itertools;
use thiserror::Error;
use verifier::{
    api::{poll_verification_status, ApiClient, ApiClientError},
    artifacts::BuildInfoStore,
    network::ExplorerSelection,
    orchestrator::{self, ConfigurationError, Summary},
    registry::{NetworkRegistry, RegistryError},
    report::ConsoleReporter,
    verifier::ExplorerVerifier,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl CliError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Api(e) => e.error_code(),
            Self::Configuration(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Args { command } = Args::parse();

    let result = match &command {
        Commands::Verify(args) => verify(args).map(|_| ()),
        Commands::Status(args) => status(args),
        Commands::List(args) => list(args),
    };

    if let Err(err) = &result {
        log::debug!("Exiting with error code {}", err.error_code());
    }
    Ok(result?)
}

fn load_registry(args: &RegistryArgs) -> Result<NetworkRegistry, RegistryError> {
    match &args.registry {
        Some(path) => NetworkRegistry::load(path),
        None => Ok(NetworkRegistry::builtin()),
    }
}

fn api_client(explorer: &ExplorerArgs, network: &str) -> Result<ApiClient, ApiClientError> {
    let chain_id = explorer
        .chain_id
        .unwrap_or_else(|| ExplorerSelection::resolve(network).explorer.chain_id());
    ApiClient::new(explorer.api_url.clone(), chain_id, explorer.api_key.clone())
}

fn verify(args: &VerifyArgs) -> Result<Summary, CliError> {
    let registry = load_registry(&args.registry)?;

    // Fail fast before touching the network or the build artifacts.
    if !registry.is_known_network(&args.network) {
        return Err(CliError::from(ConfigurationError::from(
            verifier::errors::UnknownNetwork::new(
                args.network.clone(),
                registry.networks().map(str::to_owned).collect(),
            ),
        )));
    }

    let api = api_client(&args.explorer, &args.network)?;
    let artifacts = BuildInfoStore::load(&args.build_info).unwrap_or_else(|err| {
        log::warn!("{err}");
        BuildInfoStore::default()
    });

    let verifier = WithProgress::new(ExplorerVerifier::new(api, artifacts, args.poll_policy()));
    let summary = orchestrator::run(&registry, &args.network, &verifier, &mut ConsoleReporter)?;
    Ok(summary)
}

fn status(args: &StatusArgs) -> Result<(), CliError> {
    let api = api_client(&args.explorer, &args.network)?;
    let job = match args.poll_policy() {
        Some(policy) => poll_verification_status(&api, &args.guid, policy)?,
        None => api.check_verification_status(&args.guid)?,
    };

    println!("Verification {}: {} ({})", job.guid(), job.status(), job.result);
    if job.has_failed() {
        eprintln!("The explorer rejected this submission, see the details above");
    } else if !job.is_completed() {
        println!("Still waiting on the explorer, check again or pass --watch");
    }
    Ok(())
}

fn list(args: &ListArgs) -> Result<(), CliError> {
    let registry = load_registry(&args.registry)?;

    for network in registry.networks() {
        let selection = ExplorerSelection::resolve(network);
        println!("{network} ({})", selection.explorer.browser_url());
        for entry in registry.entries_for(network).unwrap_or_default() {
            let source = entry.source_id.as_deref().unwrap_or("-");
            println!(
                "  {:<20} {}  {}  args: [{}]",
                entry.name,
                entry.address,
                source,
                entry.constructor_args.iter().join(", ")
            );
        }
    }
    Ok(())
}
