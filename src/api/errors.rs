use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

use crate::errors::RequestFailure;

#[derive(Debug, Error)]
pub enum VerificationError {
    Rejected(String),
    VerificationFailure(String),
}

impl VerificationError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "E004",
            Self::VerificationFailure(_) => "E005",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(msg) | Self::VerificationFailure(msg) => msg,
        }
    }

    pub fn suggestions(&self) -> Vec<&'static str> {
        let msg = self.message().to_lowercase();
        let mut suggestions = vec![];

        if msg.contains("api key") || msg.contains("apikey") {
            suggestions.push("Verify BSCSCAN_API_KEY is set correctly");
        }

        if msg.contains("bytecode") || msg.contains("unable to verify") {
            suggestions.push(
                "Ensure the contract was compiled with the same Solidity version and optimizer settings",
            );
            suggestions.push("Check that the constructor arguments match the deployment");
        }

        if msg.contains("rate limit") {
            suggestions.push("Wait a moment and re-run the verification");
        }

        if msg.contains("unable to locate contractcode") {
            suggestions.push("The explorer hasn't indexed the deployment yet, retry in a minute");
        }

        if suggestions.is_empty() {
            suggestions.push("Re-run with RUST_LOG=debug to see the raw explorer response");
        }

        suggestions
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let headline = match self {
            Self::Rejected(_) => "Submission rejected",
            Self::VerificationFailure(_) => "Verification failed",
        };
        writeln!(
            formatter,
            "[{}] {headline}: {}",
            self.error_code(),
            self.message()
        )?;
        write!(formatter, "\nSuggestions:")?;
        for suggestion in self.suggestions() {
            write!(formatter, "\n  • {suggestion}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("[E006] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://api.etherscan.io/v2/api\n  • Ensure the URL includes the protocol (http:// or https://)")]
    CannotBeBase(Url),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("[E007] Verification job '{0}' is still pending\n\nSuggestions:\n  • Wait a moment before checking again\n  • Check the job later with the status command")]
    InProgress(String),

    #[error(transparent)]
    Failure(#[from] RequestFailure),

    #[error(transparent)]
    Verify(#[from] VerificationError),
}

impl ApiClientError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E006",
            Self::Reqwest(_) => "E999",
            Self::InProgress(_) => "E007",
            Self::Failure(f) => f.error_code(),
            Self::Verify(v) => v.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_suggestion() {
        let error = VerificationError::Rejected("Invalid API Key".to_string());
        assert!(error
            .suggestions()
            .contains(&"Verify BSCSCAN_API_KEY is set correctly"));
    }

    #[test]
    fn test_bytecode_mismatch_suggestions() {
        let error = VerificationError::VerificationFailure(
            "Fail - Unable to verify. Compiled contract deployment bytecode does NOT match"
                .to_string(),
        );
        let suggestions = error.suggestions();
        assert!(suggestions
            .iter()
            .any(|s| s.contains("same Solidity version")));
    }

    #[test]
    fn test_generic_suggestion_when_nothing_matches() {
        let error = VerificationError::Rejected("Something odd".to_string());
        assert_eq!(error.suggestions().len(), 1);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiClientError::InProgress("abc".to_string()).error_code(), "E007");
        let verify = ApiClientError::from(VerificationError::Rejected("x".to_string()));
        assert_eq!(verify.error_code(), "E004");
        assert!(format!("{verify}").starts_with("[E004] Submission rejected: x"));
    }

    #[test]
    fn test_display_carries_suggestions() {
        let error = VerificationError::Rejected("Invalid API Key".to_string());
        assert_eq!(
            format!("{error}"),
            "[E004] Submission rejected: Invalid API Key\n\nSuggestions:\n  • Verify BSCSCAN_API_KEY is set correctly"
        );

        let error = VerificationError::VerificationFailure(
            "Fail - Unable to verify. Compiled contract deployment bytecode does NOT match"
                .to_string(),
        );
        let message = format!("{error}");
        assert!(message.starts_with("[E005] Verification failed: Fail - Unable to verify."));
        assert!(message.contains("Check that the constructor arguments match the deployment"));
    }
}
