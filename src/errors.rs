use reqwest::StatusCode;
use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

/// Maximum edit distance for a "did you mean" hint.
const SUGGESTION_DISTANCE: usize = 3;

fn closest<'a>(name: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.as_str())
}

#[derive(Debug, Error)]
pub struct RequestFailure {
    pub url: Url,
    pub status: StatusCode,
    pub msg: String,
}

impl RequestFailure {
    pub fn new(url: Url, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            url,
            status,
            msg: msg.into(),
        }
    }

    pub const fn error_code(&self) -> &'static str {
        "E002"
    }

    fn suggestions(&self) -> Vec<&'static str> {
        match self.status {
            StatusCode::NOT_FOUND => vec![
                "Check that the URL is correct",
                "Verify the explorer API endpoint with --api-url",
            ],
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => vec![
                "Check that BSCSCAN_API_KEY is set correctly",
                "Make sure the API key is enabled for the selected chain",
            ],
            StatusCode::TOO_MANY_REQUESTS => vec![
                "Wait a moment before retrying",
                "Consider reducing request frequency",
            ],
            status if status.is_server_error() => vec![
                "The explorer is having trouble, try again later",
                "Check the explorer status page",
            ],
            _ => vec!["Re-run with RUST_LOG=debug to see the raw response"],
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        writeln!(
            formatter,
            "[{}] Request to {} returned {}",
            self.error_code(),
            self.url,
            self.status
        )?;
        writeln!(formatter, "Server response: {}", self.msg)?;
        writeln!(formatter, "\nSuggestions:")?;
        for suggestion in self.suggestions() {
            writeln!(formatter, "  • {suggestion}")?;
        }
        Ok(())
    }
}

/// The requested network has no entry set in the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub struct UnknownNetwork {
    pub network: String,
    pub available: Vec<String>,
}

impl UnknownNetwork {
    #[must_use]
    pub fn new(network: impl Into<String>, available: Vec<String>) -> Self {
        Self {
            network: network.into(),
            available,
        }
    }

    pub const fn error_code(&self) -> &'static str {
        "E001"
    }
}

impl fmt::Display for UnknownNetwork {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        writeln!(
            formatter,
            "[{}] No contracts configured for network: {}",
            self.error_code(),
            self.network
        )?;

        if self.available.is_empty() {
            writeln!(formatter, "\nNo networks are defined in the registry.")?;
        } else {
            writeln!(
                formatter,
                "\nConfigured networks: {}",
                self.available.join(", ")
            )?;
            if let Some(guess) = closest(&self.network, &self.available) {
                writeln!(formatter, "Did you mean '{guess}'?")?;
            }
        }

        writeln!(formatter, "\nSuggestions:")?;
        writeln!(
            formatter,
            "  • Add a [[networks.{}]] table with the deployed contracts to the registry file",
            self.network
        )?;
        writeln!(formatter, "  • Pass the registry file with --registry")?;
        write!(formatter, "  • Select a configured network with --network")
    }
}

/// No compiled artifact matches a registry entry.
#[derive(Debug, Error)]
pub struct MissingContract {
    pub name: String,
    pub available: Vec<String>,
}

impl MissingContract {
    #[must_use]
    pub fn new(name: String, available: Vec<String>) -> Self {
        Self { name, available }
    }

    pub const fn error_code(&self) -> &'static str {
        "E003"
    }
}

impl fmt::Display for MissingContract {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        writeln!(
            formatter,
            "[{}] Contract '{}' was not found in the build artifacts",
            self.error_code(),
            self.name
        )?;

        if self.available.is_empty() {
            writeln!(formatter, "\nNo compiled contracts were found.")?;
            writeln!(formatter, "\nSuggestions:")?;
            write!(formatter, "  • Compile the project before verifying")?;
            return Ok(());
        }

        writeln!(formatter, "\nAvailable contracts: {}", self.available.join(", "))?;
        if let Some(guess) = closest(&self.name, &self.available) {
            writeln!(formatter, "Did you mean '{guess}'?")?;
        }
        writeln!(formatter, "\nSuggestions:")?;
        write!(
            formatter,
            "  • Set source_id to the fully qualified name, e.g. contracts/Token.sol:Token"
        )
    }
}
