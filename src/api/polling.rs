use std::time::Duration;

use backon::{BlockingRetryable, ExponentialBuilder};

use super::client::ApiClient;
use super::errors::ApiClientError;
use super::models::VerificationJob;

/// How long to wait for a submitted job to leave the queue.
#[derive(Clone, Copy, Debug)]
pub struct PollPolicy {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub max_polls: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
            max_polls: 10,
        }
    }
}

impl PollPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_polls)
    }
}

enum Status {
    InProgress,
    Finished(ApiClientError),
}

const fn is_in_progress(status: &Status) -> bool {
    match status {
        Status::InProgress => true,
        Status::Finished(_) => false,
    }
}

/// Keeps asking `fetch` until the job is completed or the policy runs out.
///
/// # Errors
///
/// Returns the first error `fetch` produces, or
/// [`ApiClientError::InProgress`] when the job is still pending after the
/// last poll.
pub fn poll_until_completed<F>(
    guid: &str,
    policy: PollPolicy,
    fetch: F,
) -> Result<VerificationJob, ApiClientError>
where
    F: Fn() -> Result<VerificationJob, ApiClientError>,
{
    let attempt = || -> Result<VerificationJob, Status> {
        let job = fetch().map_err(Status::Finished)?;
        if job.is_completed() {
            Ok(job)
        } else {
            Err(Status::InProgress)
        }
    };

    attempt
        .retry(policy.backoff())
        .when(is_in_progress)
        .notify(|_, dur: Duration| {
            log::info!("Job {guid} is still pending, checking again in {dur:?}");
        })
        .call()
        .map_err(|err| match err {
            Status::InProgress => ApiClientError::InProgress(guid.to_owned()),
            Status::Finished(e) => e,
        })
}

/// # Errors
///
/// Will return `Err` on network error or if the job never completes
/// within `policy`.
pub fn poll_verification_status(
    api: &ApiClient,
    guid: &str,
    policy: PollPolicy,
) -> Result<VerificationJob, ApiClientError> {
    poll_until_completed(guid, policy, || api.check_verification_status(guid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{VerificationError, VerifyJobStatus};
    use std::cell::Cell;

    fn fast() -> PollPolicy {
        PollPolicy {
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            max_polls: 3,
        }
    }

    fn job(status: VerifyJobStatus) -> VerificationJob {
        VerificationJob {
            guid: "guid".to_string(),
            status,
            result: String::new(),
        }
    }

    #[test]
    fn test_returns_once_completed() {
        let calls = Cell::new(0);
        let result = poll_until_completed("guid", fast(), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Ok(job(VerifyJobStatus::Pending))
            } else {
                Ok(job(VerifyJobStatus::Success))
            }
        })
        .unwrap();

        assert_eq!(result.status(), &VerifyJobStatus::Success);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_gives_up_while_pending() {
        let calls = Cell::new(0);
        let result = poll_until_completed("guid", fast(), || {
            calls.set(calls.get() + 1);
            Ok(job(VerifyJobStatus::Pending))
        });

        assert!(matches!(result, Err(ApiClientError::InProgress(guid)) if guid == "guid"));
        // first attempt plus max_polls retries
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_errors_are_not_polled_again() {
        let calls = Cell::new(0);
        let result = poll_until_completed("guid", fast(), || {
            calls.set(calls.get() + 1);
            Err(ApiClientError::from(VerificationError::Rejected(
                "Invalid API Key".to_string(),
            )))
        });

        assert!(matches!(result, Err(ApiClientError::Verify(_))));
        assert_eq!(calls.get(), 1);
    }
}
