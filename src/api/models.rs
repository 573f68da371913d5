use serde::{Deserialize, Serialize};

use super::types::VerifyJobStatus;

/// Envelope every Etherscan-compatible endpoint answers with.
#[derive(Debug, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    pub message: String,
    pub result: String,
}

/// Form body of `module=contract&action=verifysourcecode`.
#[derive(Clone, Debug, Serialize)]
pub struct VerifySourceCode {
    #[serde(rename = "contractaddress")]
    pub contract_address: String,
    #[serde(rename = "sourceCode")]
    pub source_code: String,
    #[serde(rename = "codeformat")]
    pub code_format: String,
    /// Fully qualified `path/File.sol:Contract`.
    #[serde(rename = "contractname")]
    pub contract_name: String,
    /// `v`-prefixed long version, e.g. `v0.8.20+commit.a1b79de6`.
    #[serde(rename = "compilerversion")]
    pub compiler_version: String,
    /// Hex without `0x`. The misspelling is the explorer's.
    #[serde(rename = "constructorArguements")]
    pub constructor_arguments: String,
}

impl VerifySourceCode {
    pub const STANDARD_JSON: &'static str = "solidity-standard-json-input";
}

#[derive(Debug, Clone)]
pub struct VerificationJob {
    pub guid: String,
    pub status: VerifyJobStatus,
    pub result: String,
}

impl VerificationJob {
    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub const fn status(&self) -> &VerifyJobStatus {
        &self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.status, VerifyJobStatus::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_uses_explorer_field_names() {
        let form = VerifySourceCode {
            contract_address: "0xFBf7B5d91297aC0b0b2D184af0b9F81FE053819a".to_string(),
            source_code: "{}".to_string(),
            code_format: VerifySourceCode::STANDARD_JSON.to_string(),
            contract_name: "contracts/BNOU.sol:BNOU".to_string(),
            compiler_version: "v0.8.20+commit.a1b79de6".to_string(),
            constructor_arguments: String::new(),
        };

        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["contractaddress"], "0xFBf7B5d91297aC0b0b2D184af0b9F81FE053819a");
        assert_eq!(value["codeformat"], "solidity-standard-json-input");
        assert_eq!(value["contractname"], "contracts/BNOU.sol:BNOU");
        assert_eq!(value["constructorArguements"], "");
    }

    #[test]
    fn test_response_envelope() {
        let raw = r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#;
        let response: EtherscanResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.status, "0");
        assert_eq!(response.result, "Invalid API Key");
    }
}
