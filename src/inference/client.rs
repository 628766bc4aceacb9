use super::ModelSpec;
use crate::{
    config::Config,
    error::{GenError, Result},
};
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde_json::json;
use std::fmt;
use std::time::Duration;

/// Why a single model attempt did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Status { code: u16, body: String },
    Timeout,
    Transport(String),
    Undecodable(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status { code, body } if body.is_empty() => {
                write!(f, "API error {}", code)
            }
            FailureReason::Status { code, body } => write!(f, "API error {}: {}", code, body),
            FailureReason::Timeout => write!(f, "request timed out"),
            FailureReason::Transport(msg) => write!(f, "connection error: {}", msg),
            FailureReason::Undecodable(msg) => write!(f, "undecodable image payload: {}", msg),
        }
    }
}

/// One round trip to a model endpoint. Implementations return the raw
/// response body of a 200 reply; everything else is a `FailureReason`.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn infer(
        &self,
        spec: &ModelSpec,
        inputs: &str,
    ) -> std::result::Result<Vec<u8>, FailureReason>;
}

#[derive(Clone)]
pub struct HttpInference {
    client: Client,
    token: Option<String>,
}

impl HttpInference {
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenError::Client(e.to_string()))?;

        Ok(Self { client, token })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.hf_token.clone(), config.request_timeout)
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn build_request(&self, spec: &ModelSpec, inputs: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(&spec.endpoint)
            .json(&json!({ "inputs": inputs }));

        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }
}

fn classify_transport(e: reqwest::Error) -> FailureReason {
    if e.is_timeout() {
        FailureReason::Timeout
    } else {
        FailureReason::Transport(e.to_string())
    }
}

#[async_trait]
impl InferenceBackend for HttpInference {
    async fn infer(
        &self,
        spec: &ModelSpec,
        inputs: &str,
    ) -> std::result::Result<Vec<u8>, FailureReason> {
        log::debug!("POST {} (auth: {})", spec.endpoint, self.has_token());

        let response = self
            .build_request(spec, inputs)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FailureReason::Status {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(classify_transport)?;
        Ok(bytes.to_vec())
    }
}
