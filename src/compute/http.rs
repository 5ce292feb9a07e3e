use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::ComputeError;
use crate::quiz::AnswerMap;

use super::{parse_response, ComputeClient, EmissionResult};

/// Compute client that POSTs the answer map as JSON to the backend endpoint.
#[derive(Debug, Clone)]
pub struct HttpComputeClient {
    client: Client,
    endpoint: String,
}

impl HttpComputeClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ComputeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ComputeError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ComputeClient for HttpComputeClient {
    async fn compute(&self, answers: &AnswerMap) -> Result<EmissionResult, ComputeError> {
        debug!(endpoint = %self.endpoint, "posting answers");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(answers)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "compute request failed");
                if err.is_timeout() {
                    ComputeError::Transport("request timed out".into())
                } else {
                    ComputeError::Transport(err.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "compute endpoint returned error status");
            return Err(ComputeError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|err| ComputeError::Transport(err.to_string()))?;
        parse_response(&body)
    }
}
