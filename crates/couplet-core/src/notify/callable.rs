//! HTTP client for the server-side callable push endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PushError;
use crate::notify::NudgeData;
use crate::store::PushDelivery;

#[derive(Serialize)]
struct CallableRequest<'a> {
    token: &'a str,
    title: &'a str,
    body: &'a str,
    data: &'a NudgeData,
}

#[derive(Deserialize)]
struct CallableResponse {
    #[serde(rename = "messageId")]
    message_id: String,
}

/// [`PushDelivery`] over the deployed callable function.
///
/// The request is authenticated with the sender's identity token as a
/// bearer header. No explicit deadline beyond the client timeout; no
/// retries -- a failed call surfaces to the caller.
pub struct CallablePushClient {
    http: reqwest::Client,
    endpoint: String,
    id_token: String,
}

impl CallablePushClient {
    /// Build a client against `endpoint`, authenticating as the holder of
    /// `id_token`.
    ///
    /// # Errors
    /// Returns a transport error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        endpoint: impl Into<String>,
        id_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PushError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            id_token: id_token.into(),
        })
    }

    /// Build from persisted configuration, authenticating as the holder
    /// of `id_token`.
    pub fn from_config(
        config: &crate::config::NudgeConfig,
        id_token: impl Into<String>,
    ) -> Result<Self, PushError> {
        Self::new(
            config.endpoint.clone(),
            id_token,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl PushDelivery for CallablePushClient {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: &NudgeData,
    ) -> Result<String, PushError> {
        let request = CallableRequest {
            token,
            title,
            body,
            data,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.id_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PushError::RecipientNotFound(token.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PushError::DeliveryFailed {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CallableResponse = response
            .json()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;
        Ok(parsed.message_id)
    }
}
