//! The compute call: the one seam between the quiz and the emission backend.

mod http;
mod result;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ComputeError;
use crate::quiz::AnswerMap;

pub use http::HttpComputeClient;
pub use result::{Amounts, EmissionResult};

/// Converts a complete answer map into computed emissions.
#[async_trait]
pub trait ComputeClient: Send + Sync {
    async fn compute(&self, answers: &AnswerMap) -> Result<EmissionResult, ComputeError>;
}

/// Interprets a successful (2xx) response body.
///
/// A body carrying an `error`/`erro` message is a domain error; anything that
/// does not match the result shape is malformed.
pub fn parse_response(body: &str) -> Result<EmissionResult, ComputeError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| ComputeError::Malformed(err.to_string()))?;

    if let Some(message) = ["error", "erro"]
        .iter()
        .find_map(|key| value.get(key).and_then(domain_message))
    {
        return Err(ComputeError::Domain(message));
    }

    serde_json::from_value(value).map_err(|err| ComputeError::Malformed(err.to_string()))
}

fn domain_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
