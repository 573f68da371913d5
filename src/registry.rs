use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, fs, io};
use thiserror::Error;

use crate::address::Address;

/// A single deployed contract awaiting verification.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RegistryEntry {
    pub name: String,
    pub address: Address,
    /// Fully qualified `path/File.sol:Contract`, only needed when several
    /// compiled contracts could match the deployed bytecode.
    #[serde(default)]
    pub source_id: Option<String>,
    /// Passed through untouched, a mismatch surfaces from the explorer.
    #[serde(default)]
    pub constructor_args: Vec<Value>,
}

impl RegistryEntry {
    pub fn new(
        name: impl Into<String>,
        address: Address,
        source_id: Option<String>,
        constructor_args: Vec<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            source_id,
            constructor_args,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("[E030] Duplicate contract name '{name}' on network '{network}'\n\nSuggestions:\n  • Give every contract on a network a unique name\n  • Remove the stale entry left over from a previous deployment")]
    DuplicateName { network: String, name: String },

    #[error("[E031] Address {address} is registered twice on network '{network}' ('{first}' and '{second}')\n\nSuggestions:\n  • Check that each entry points to its own deployment\n  • Addresses are compared case-insensitively")]
    DuplicateAddress {
        network: String,
        address: Address,
        first: String,
        second: String,
    },

    #[error("[E032] Failed to parse registry file '{path}': {error}\n\nSuggestions:\n  • Check TOML syntax is valid\n  • Each contract is a [[networks.<name>]] table with name and address keys\n  • Addresses must be 0x followed by 40 hexadecimal characters")]
    Parse { path: Utf8PathBuf, error: String },

    #[error("[E033] Couldn't read registry file '{path}': {error}\n\nSuggestions:\n  • Check the file exists and is readable\n  • Pass the correct path with --registry")]
    Io { path: Utf8PathBuf, error: io::Error },
}

impl RegistryError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "E030",
            Self::DuplicateAddress { .. } => "E031",
            Self::Parse { .. } => "E032",
            Self::Io { .. } => "E033",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    networks: BTreeMap<String, Vec<RegistryEntry>>,
}

/// Per-network table of contracts to verify, in declaration order.
///
/// Immutable once built; every constructor checks that names and
/// addresses are unique within a network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, Vec<RegistryEntry>>,
}

impl NetworkRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the entry set of `network`.
    ///
    /// # Errors
    ///
    /// Fails if two entries share a name or an address.
    pub fn with_network(
        mut self,
        network: impl Into<String>,
        entries: Vec<RegistryEntry>,
    ) -> Result<Self, RegistryError> {
        let network = network.into();
        validate(&network, &entries)?;
        self.networks.insert(network, entries);
        Ok(self)
    }

    /// The table shipped with the tool.
    #[must_use]
    pub fn builtin() -> Self {
        let bnou = |address: &str| {
            vec![RegistryEntry::new(
                "bnou",
                Address(address.to_owned()),
                Some("contracts/BNOU.sol:BNOU".to_owned()),
                vec![],
            )]
        };

        let mut networks = BTreeMap::new();
        networks.insert(
            "bscTestnet".to_owned(),
            bnou("0xFBf7B5d91297aC0b0b2D184af0b9F81FE053819a"),
        );
        networks.insert(
            "bsc".to_owned(),
            bnou("0x4f47f066d839634bf4e992021a65d209B383EE1e"),
        );
        Self { networks }
    }

    /// # Errors
    ///
    /// Fails on malformed TOML, invalid addresses or duplicate entries.
    pub fn from_toml_str(raw: &str, path: &Utf8Path) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(raw).map_err(|e| RegistryError::Parse {
            path: path.to_owned(),
            error: e.to_string(),
        })?;

        file.networks
            .into_iter()
            .try_fold(Self::new(), |registry, (network, entries)| {
                registry.with_network(network, entries)
            })
    }

    /// # Errors
    ///
    /// Fails if the file can't be read or doesn't hold a valid registry.
    pub fn load(path: &Utf8Path) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path).map_err(|error| RegistryError::Io {
            path: path.to_owned(),
            error,
        })?;
        log::debug!("Loaded registry from {path}");
        Self::from_toml_str(&raw, path)
    }

    /// Entries of `network` in declaration order. `None` means the
    /// network is unknown, `Some(&[])` that it has nothing to verify.
    #[must_use]
    pub fn entries_for(&self, network: &str) -> Option<&[RegistryEntry]> {
        self.networks.get(network).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_known_network(&self, network: &str) -> bool {
        self.networks.contains_key(network)
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }
}

fn validate(network: &str, entries: &[RegistryEntry]) -> Result<(), RegistryError> {
    for (index, entry) in entries.iter().enumerate() {
        for earlier in &entries[..index] {
            if earlier.name == entry.name {
                return Err(RegistryError::DuplicateName {
                    network: network.to_owned(),
                    name: entry.name.clone(),
                });
            }
            if earlier.address.same_as(&entry.address) {
                return Err(RegistryError::DuplicateAddress {
                    network: network.to_owned(),
                    address: entry.address.clone(),
                    first: earlier.name.clone(),
                    second: entry.name.clone(),
                });
            }
        }
    }
    Ok(())
}
