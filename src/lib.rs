//! # Contract Verifier
//!
//! Submits deployed contracts to a BscScan-compatible block explorer for
//! source verification and reports what happened to each of them.
//!
//! A [`registry::NetworkRegistry`] lists, per network, the contracts to
//! verify. [`orchestrator::run`] walks the entries of one network in order,
//! hands each to a [`verifier::Verifier`] and classifies the answer as
//! newly verified, already verified, or failed. One failing contract never
//! stops the others.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use verifier::{
//!     api::{ApiClient, PollPolicy, DEFAULT_API_URL},
//!     artifacts::BuildInfoStore,
//!     orchestrator,
//!     registry::NetworkRegistry,
//!     report::ConsoleReporter,
//!     verifier::ExplorerVerifier,
//! };
//! use camino::Utf8Path;
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = NetworkRegistry::builtin();
//! let api = ApiClient::new(Url::parse(DEFAULT_API_URL)?, 97, "API_KEY")?;
//! let artifacts = BuildInfoStore::load(Utf8Path::new("artifacts/build-info"))?;
//! let verifier = ExplorerVerifier::new(api, artifacts, Some(PollPolicy::default()));
//!
//! let summary = orchestrator::run(&registry, "bscTestnet", &verifier, &mut ConsoleReporter)?;
//! println!("{}/{} verified", summary.verified(), summary.attempted());
//! # Ok(())
//! # }
//! ```

/// ABI encoding of constructor arguments
pub mod abi;

/// Validated contract addresses
pub mod address;

/// Client for Etherscan-compatible verification APIs
pub mod api;

/// Compiled contract lookup in Hardhat build info
pub mod artifacts;

/// Error types with actionable suggestions
pub mod errors;

/// Known networks and their block explorers
pub mod network;

/// Runs verification over a network's registry entries
pub mod orchestrator;

/// Per-network table of deployed contracts
pub mod registry;

/// Console reporting of verification runs
pub mod report;

/// The verification operation and its explorer-backed implementation
pub mod verifier;
