use reqwest::{
    blocking::{self, Client},
    StatusCode,
};
use url::Url;

use crate::errors::RequestFailure;

use super::errors::ApiClientError;
use super::models::{EtherscanResponse, VerificationJob, VerifySourceCode};
use super::types::{SubmitOutcome, VerifyJobStatus};

/// Etherscan v2 multichain endpoint.
pub const DEFAULT_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Client for an Etherscan-compatible `contract` module.
///
/// The API key is attached to each request rather than to the stored
/// URL, so URLs in errors and logs never carry it.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    chain_id: u64,
    api_key: String,
    client: Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Fails if provided `Url` cannot be a base.
    pub fn new(base: Url, chain_id: u64, api_key: impl Into<String>) -> Result<Self, ApiClientError> {
        if base.cannot_be_a_base() {
            Err(ApiClientError::CannotBeBase(base))
        } else {
            Ok(Self {
                base,
                chain_id,
                api_key: api_key.into(),
                client: blocking::Client::new(),
            })
        }
    }

    #[must_use]
    pub fn action_url(&self, action: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("chainid", &self.chain_id.to_string())
            .append_pair("module", "contract")
            .append_pair("action", action);
        url
    }

    fn read_envelope(
        url: &Url,
        response: blocking::Response,
    ) -> Result<EtherscanResponse, ApiClientError> {
        let status = response.status();
        let text = response.text()?;
        log::debug!("Raw API Response: {text}");
        parse_envelope(url, status, &text)
    }

    /// Submits sources for verification.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network failure or when the explorer
    /// rejects the submission for any reason other than the contract
    /// being verified already.
    pub fn submit_verification(
        &self,
        request: &VerifySourceCode,
    ) -> Result<SubmitOutcome, ApiClientError> {
        let url = self.action_url("verifysourcecode");
        log::info!(
            "Submitting {} at {} to chain {}",
            request.contract_name,
            request.contract_address,
            self.chain_id
        );

        let response = self
            .client
            .post(url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .form(request)
            .send()?;
        let envelope = Self::read_envelope(&url, response)?;
        Ok(SubmitOutcome::from_envelope(envelope)?)
    }

    /// # Errors
    ///
    /// Will return `Err` on network failure or a malformed response.
    pub fn check_verification_status(&self, guid: &str) -> Result<VerificationJob, ApiClientError> {
        let url = self.action_url("checkverifystatus");
        let response = self
            .client
            .get(url.clone())
            .query(&[("guid", guid), ("apikey", self.api_key.as_str())])
            .send()?;
        let envelope = Self::read_envelope(&url, response)?;

        Ok(VerificationJob {
            guid: guid.to_owned(),
            status: VerifyJobStatus::from_response(&envelope.status, &envelope.result),
            result: envelope.result,
        })
    }
}

/// Anything but a 200 with a JSON envelope is a [`RequestFailure`].
fn parse_envelope(
    url: &Url,
    status: StatusCode,
    text: &str,
) -> Result<EtherscanResponse, ApiClientError> {
    if status != StatusCode::OK {
        return Err(ApiClientError::from(RequestFailure::new(
            url.clone(),
            status,
            text,
        )));
    }

    serde_json::from_str(text).map_err(|e| {
        log::error!("Failed to parse JSON response: {e}");
        ApiClientError::from(RequestFailure::new(
            url.clone(),
            status,
            format!("Failed to parse JSON response: {e}"),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(Url::parse(DEFAULT_API_URL).unwrap(), 97, "secret").unwrap()
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:ops@example.com").unwrap();
        let result = ApiClient::new(url, 56, "key");
        assert!(matches!(result, Err(ApiClientError::CannotBeBase(_))));
    }

    #[test]
    fn test_action_url_carries_chain_and_action() {
        let url = client().action_url("verifysourcecode");
        assert_eq!(
            url.as_str(),
            "https://api.etherscan.io/v2/api?chainid=97&module=contract&action=verifysourcecode"
        );
    }

    #[test]
    fn test_action_url_never_contains_api_key() {
        let url = client().action_url("checkverifystatus");
        assert!(!url.as_str().contains("secret"));
    }

    #[test]
    fn test_envelope_from_ok_response() {
        let url = client().action_url("verifysourcecode");
        let envelope = parse_envelope(
            &url,
            StatusCode::OK,
            r#"{"status":"1","message":"OK","result":"guid"}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, "1");
        assert_eq!(envelope.result, "guid");
    }

    #[test]
    fn test_non_200_is_request_failure() {
        let url = client().action_url("verifysourcecode");
        let error = parse_envelope(&url, StatusCode::FORBIDDEN, "Forbidden").unwrap_err();

        let ApiClientError::Failure(failure) = error else {
            panic!("Expected a request failure");
        };
        assert_eq!(failure.status, StatusCode::FORBIDDEN);
        assert_eq!(failure.msg, "Forbidden");
        assert!(!failure.url.as_str().contains("secret"));
    }

    #[test]
    fn test_malformed_body_is_request_failure() {
        let url = client().action_url("checkverifystatus");
        let error = parse_envelope(&url, StatusCode::OK, "<html>").unwrap_err();
        assert_eq!(error.error_code(), "E002");
        assert!(format!("{error}").contains("Failed to parse JSON response"));
    }
}
