// Re-export the API module components
pub use self::{
    client::{ApiClient, DEFAULT_API_URL},
    errors::{ApiClientError, VerificationError},
    models::{EtherscanResponse, VerificationJob, VerifySourceCode},
    polling::{poll_until_completed, poll_verification_status, PollPolicy},
    types::{is_already_verified_result, SubmitOutcome, VerifyJobStatus},
};

// Module declarations
mod client;
mod errors;
mod models;
mod polling;
mod types;
