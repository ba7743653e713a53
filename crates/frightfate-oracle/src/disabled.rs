//! An oracle that is switched off.

use async_trait::async_trait;
use frightfate_core::oracle::{NarrativeOracle, OracleError, OracleRequest};

/// Reports every call as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOracle;

#[async_trait]
impl NarrativeOracle for DisabledOracle {
    async fn generate(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        Err(OracleError::Unavailable("oracle disabled: no API key configured".to_owned()))
    }
}
