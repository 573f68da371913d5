use serde_json::Value;
use thiserror::Error;

use crate::{
    abi::{self, AbiError},
    address::Address,
    api::{
        poll_verification_status, ApiClient, ApiClientError, PollPolicy, SubmitOutcome,
        VerificationError, VerifyJobStatus, VerifySourceCode,
    },
    artifacts::{ArtifactError, BuildInfoStore},
    registry::RegistryEntry,
};

/// Inputs of one verification attempt, borrowed from a registry entry.
#[derive(Clone, Copy, Debug)]
pub struct VerificationRequest<'a> {
    pub name: &'a str,
    pub address: &'a Address,
    pub constructor_args: &'a [Value],
    pub source_id: Option<&'a str>,
}

impl<'a> From<&'a RegistryEntry> for VerificationRequest<'a> {
    fn from(entry: &'a RegistryEntry) -> Self {
        Self {
            name: &entry.name,
            address: &entry.address,
            constructor_args: &entry.constructor_args,
            source_id: entry.source_id.as_deref(),
        }
    }
}

/// Structured success signal of a verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Verified,
    AlreadyVerified,
}

/// A failed attempt. Only the message is kept; callers that can't get a
/// structured [`Submission::AlreadyVerified`] look for "already verified"
/// in it, in any casing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct VerifierError {
    message: String,
}

impl VerifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ApiClientError> for VerifierError {
    fn from(error: ApiClientError) -> Self {
        Self::new(error.to_string())
    }
}

impl From<ArtifactError> for VerifierError {
    fn from(error: ArtifactError) -> Self {
        Self::new(error.to_string())
    }
}

impl From<AbiError> for VerifierError {
    fn from(error: AbiError) -> Self {
        Self::new(error.to_string())
    }
}

/// The external verification operation: one submission per call,
/// blocking until the service answers.
pub trait Verifier {
    /// # Errors
    ///
    /// Any failure to get the contract verified, with a human readable
    /// message.
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<Submission, VerifierError>;
}

impl<V: Verifier + ?Sized> Verifier for &V {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<Submission, VerifierError> {
        (**self).verify(request)
    }
}

/// Verifies against an Etherscan-compatible explorer using sources from
/// Hardhat build info.
pub struct ExplorerVerifier {
    api: ApiClient,
    artifacts: BuildInfoStore,
    /// `None` reports an accepted submission without waiting for the outcome.
    wait: Option<PollPolicy>,
}

impl ExplorerVerifier {
    #[must_use]
    pub fn new(api: ApiClient, artifacts: BuildInfoStore, wait: Option<PollPolicy>) -> Self {
        Self {
            api,
            artifacts,
            wait,
        }
    }

    fn prepare(&self, request: &VerificationRequest<'_>) -> Result<VerifySourceCode, VerifierError> {
        let artifact = self.artifacts.find(request.name, request.source_id)?;
        let constructor_arguments =
            abi::encode_constructor_args(&artifact.abi, request.constructor_args)?;

        Ok(VerifySourceCode {
            contract_address: request.address.to_string(),
            source_code: artifact.standard_json_input.to_string(),
            code_format: VerifySourceCode::STANDARD_JSON.to_owned(),
            contract_name: artifact.input_name.clone(),
            compiler_version: format!("v{}", artifact.compiler_version),
            constructor_arguments,
        })
    }
}

impl Verifier for ExplorerVerifier {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<Submission, VerifierError> {
        let form = self.prepare(request)?;

        let guid = match self.api.submit_verification(&form)? {
            SubmitOutcome::AlreadyVerified => return Ok(Submission::AlreadyVerified),
            SubmitOutcome::Submitted(guid) => guid,
        };
        log::info!("Submitted {} for verification, GUID: {guid}", request.name);

        let Some(policy) = self.wait else {
            return Ok(Submission::Verified);
        };

        let job = poll_verification_status(&self.api, &guid, policy)?;
        match job.status {
            VerifyJobStatus::Success => Ok(Submission::Verified),
            VerifyJobStatus::AlreadyVerified => Ok(Submission::AlreadyVerified),
            VerifyJobStatus::Fail => Err(VerifierError::from(ApiClientError::from(
                VerificationError::VerificationFailure(job.result),
            ))),
            VerifyJobStatus::Pending => Err(VerifierError::from(ApiClientError::InProgress(guid))),
        }
    }
}
