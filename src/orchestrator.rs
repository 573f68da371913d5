//! Drives one verification attempt per registry entry of a network.
//!
//! Entries are processed strictly in registry order, one at a time. A
//! failing entry never stops the run; only an unknown network does, and
//! it does so before any attempt is made.

use thiserror::Error;

use crate::{
    address::Address,
    errors::UnknownNetwork,
    network::ExplorerSelection,
    registry::{NetworkRegistry, RegistryEntry},
    report::Reporter,
    verifier::{Submission, VerificationRequest, Verifier, VerifierError},
};

/// Marker searched for, ignoring case, in failure messages.
pub const ALREADY_VERIFIED_MARKER: &str = "already verified";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error(transparent)]
    UnknownNetwork(#[from] UnknownNetwork),
}

impl ConfigurationError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownNetwork(e) => e.error_code(),
        }
    }
}

/// Terminal state of one entry. There is no way back to pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    AlreadyVerified,
    Failed(String),
}

impl Outcome {
    /// Both fresh and previous verifications count as verified.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Succeeded | Self::AlreadyVerified)
    }
}

/// Maps the verifier's answer onto an [`Outcome`].
#[must_use]
pub fn classify(result: Result<Submission, VerifierError>) -> Outcome {
    match result {
        Ok(Submission::Verified) => Outcome::Succeeded,
        Ok(Submission::AlreadyVerified) => Outcome::AlreadyVerified,
        Err(error) if mentions_already_verified(error.message()) => Outcome::AlreadyVerified,
        Err(error) => Outcome::Failed(error.message().to_owned()),
    }
}

fn mentions_already_verified(message: &str) -> bool {
    message.to_lowercase().contains(ALREADY_VERIFIED_MARKER)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryReport {
    pub name: String,
    pub address: Address,
    pub outcome: Outcome,
}

/// Result of a run over a known network, entries in registry order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub network: String,
    pub explorer: ExplorerSelection,
    pub entries: Vec<EntryReport>,
}

impl Summary {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn verified(&self) -> usize {
        self.count(Outcome::is_verified)
    }

    #[must_use]
    pub fn newly_verified(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Succeeded))
    }

    #[must_use]
    pub fn already_verified(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::AlreadyVerified))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

fn attempt<V: Verifier + ?Sized>(verifier: &V, entry: &RegistryEntry) -> EntryReport {
    let outcome = classify(verifier.verify(&VerificationRequest::from(entry)));
    log::debug!("{} at {} finished as {outcome:?}", entry.name, entry.address);

    EntryReport {
        name: entry.name.clone(),
        address: entry.address.clone(),
        outcome,
    }
}

/// Verifies every contract registered for `network`.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownNetwork`] without calling the
/// verifier when the registry has no entry set for `network`. Failures of
/// individual entries are part of the [`Summary`], never an `Err`.
pub fn run<V, R>(
    registry: &NetworkRegistry,
    network: &str,
    verifier: &V,
    reporter: &mut R,
) -> Result<Summary, ConfigurationError>
where
    V: Verifier + ?Sized,
    R: Reporter + ?Sized,
{
    let entries = registry.entries_for(network).ok_or_else(|| {
        UnknownNetwork::new(network, registry.networks().map(str::to_owned).collect())
    })?;

    reporter.started(network, entries.len());

    let mut reports = Vec::with_capacity(entries.len());
    for entry in entries {
        reporter.attempting(entry);
        let report = attempt(verifier, entry);
        reporter.finished(&report);
        reports.push(report);
    }

    let summary = Summary {
        network: network.to_owned(),
        explorer: ExplorerSelection::resolve(network),
        entries: reports,
    };
    reporter.completed(&summary);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_signals() {
        assert_eq!(classify(Ok(Submission::Verified)), Outcome::Succeeded);
        assert_eq!(
            classify(Ok(Submission::AlreadyVerified)),
            Outcome::AlreadyVerified
        );
    }

    #[test]
    fn test_already_verified_marker_any_casing() {
        for message in [
            "Already Verified",
            "already verified",
            "ALREADY VERIFIED",
            "Contract source code already verified",
            "Error: Smart-contract Already Verified.",
        ] {
            assert_eq!(
                classify(Err(VerifierError::new(message))),
                Outcome::AlreadyVerified,
                "{message}"
            );
        }
    }

    #[test]
    fn test_other_failures_keep_message() {
        assert_eq!(
            classify(Err(VerifierError::new("Invalid API key"))),
            Outcome::Failed("Invalid API key".to_string())
        );
    }

    #[test]
    fn test_marker_must_be_contiguous() {
        assert_eq!(
            classify(Err(VerifierError::new("already been verified"))),
            Outcome::Failed("already been verified".to_string())
        );
    }

    #[test]
    fn test_is_verified() {
        assert!(Outcome::Succeeded.is_verified());
        assert!(Outcome::AlreadyVerified.is_verified());
        assert!(!Outcome::Failed(String::new()).is_verified());
    }

    #[test]
    fn test_summary_counters() {
        let address = Address::new("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let report = |outcome| EntryReport {
            name: "x".to_string(),
            address: address.clone(),
            outcome,
        };
        let summary = Summary {
            network: "testA".to_string(),
            explorer: ExplorerSelection::resolve("testA"),
            entries: vec![
                report(Outcome::Succeeded),
                report(Outcome::AlreadyVerified),
                report(Outcome::Failed("boom".to_string())),
            ],
        };

        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.verified(), 2);
        assert_eq!(summary.newly_verified(), 1);
        assert_eq!(summary.already_verified(), 1);
        assert_eq!(summary.failed(), 1);
    }
}
