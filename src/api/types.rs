use std::fmt::Display;

use super::errors::VerificationError;
use super::models::EtherscanResponse;

/// Messages explorers use when a submission targets an already verified
/// contract. Etherscan-family explorers, then Blockscout.
const ALREADY_VERIFIED_RESULTS: [&str; 3] = [
    "Contract source code already verified",
    "Already Verified",
    "Smart-contract already verified.",
];

#[must_use]
pub fn is_already_verified_result(result: &str) -> bool {
    ALREADY_VERIFIED_RESULTS.contains(&result.trim())
}

/// State of a submitted verification job, as reported by
/// `action=checkverifystatus`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyJobStatus {
    Pending,
    Success,
    AlreadyVerified,
    Fail,
}

impl VerifyJobStatus {
    /// Etherscan answers with a `status` flag and a prose `result`; only
    /// the combination tells the states apart.
    #[must_use]
    pub fn from_response(status: &str, result: &str) -> Self {
        match result.trim() {
            "Pending in queue" | "Unable to verify" => Self::Pending,
            "Pass - Verified" => Self::Success,
            other if is_already_verified_result(other) => Self::AlreadyVerified,
            _ if status == "1" => Self::Success,
            _ => Self::Fail,
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for VerifyJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Success => write!(f, "Success"),
            Self::AlreadyVerified => write!(f, "AlreadyVerified"),
            Self::Fail => write!(f, "Fail"),
        }
    }
}

/// Result of a submission before any polling happens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted, the explorer returned a job GUID.
    Submitted(String),
    AlreadyVerified,
}

impl SubmitOutcome {
    /// Reads the answer to a `verifysourcecode` submission.
    ///
    /// # Errors
    ///
    /// Any `status` other than `"1"` that isn't an already-verified answer
    /// is a rejection carrying the explorer's message.
    pub fn from_envelope(envelope: EtherscanResponse) -> Result<Self, VerificationError> {
        if envelope.status == "1" {
            return Ok(Self::Submitted(envelope.result));
        }

        if is_already_verified_result(&envelope.result) {
            return Ok(Self::AlreadyVerified);
        }

        log::warn!("Failed verify submission: {envelope:?}");
        Err(VerificationError::Rejected(envelope.result))
    }
}
