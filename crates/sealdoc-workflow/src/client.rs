// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workflow client. One POST per query, bearer-token authenticated.

use std::time::Duration;

use reqwest::Client;
use sealdoc_core::AppConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::WorkflowError;

/// User identifier sent when the caller does not supply one.
pub const DEFAULT_USER: &str = "sealdoc-user";

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    inputs: RunInputs<'a>,
    response_mode: &'a str,
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct RunInputs<'a> {
    query: &'a str,
}

/// Client for the workflow `run` endpoint.
#[derive(Clone)]
pub struct WorkflowClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    default_timeout: Duration,
}

impl WorkflowClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, WorkflowError> {
        Ok(Self::with_client(Client::builder().build()?, url, api_key))
    }

    /// Use an already-configured HTTP client.
    pub fn with_client(client: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
            default_timeout: Duration::from_secs(120),
        }
    }

    /// Endpoint, key and timeout from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, WorkflowError> {
        let mut client = Self::new(config.workflow_url.clone(), config.workflow_api_key.clone())?;
        client.default_timeout = Duration::from_secs(config.workflow_timeout_secs);
        Ok(client)
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Run the workflow for `query` and return its `result` output.
    ///
    /// `user_id` defaults to [`DEFAULT_USER`]. No retries.
    #[instrument(skip(self, query), fields(url = %self.url, query_len = query.len()))]
    pub async fn query(
        &self,
        query: &str,
        user_id: Option<&str>,
        timeout: Duration,
    ) -> Result<String, WorkflowError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(WorkflowError::MissingApiKey)?;

        let body = RunRequest {
            inputs: RunInputs { query },
            response_mode: "blocking",
            user: user_id.unwrap_or(DEFAULT_USER),
        };

        info!(user = body.user, "Running workflow");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(err, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Workflow API returned an error status");
            return Err(WorkflowError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await.map_err(|err| classify(err, timeout))?;
        debug!("Workflow response received");
        extract_result(data)
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> WorkflowError {
    if err.is_timeout() {
        WorkflowError::Timeout(timeout.as_secs())
    } else {
        WorkflowError::Http(err)
    }
}

/// Pull `data.outputs.result` out of a run response.
fn extract_result(data: Value) -> Result<String, WorkflowError> {
    let result = data
        .get("data")
        .and_then(|d| d.get("outputs"))
        .map(|outputs| match outputs.get("result") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        });

    match result {
        None => Err(WorkflowError::UnexpectedResponse(data)),
        Some(text) if text.is_empty() => Err(WorkflowError::EmptyResult(data)),
        Some(text) => Ok(text),
    }
}

/// Flatten a query outcome into the text shown to the caller.
///
/// Transport failures are prefixed `error: `; a reachable service that
/// answered with nothing usable is reported without the prefix.
pub fn query_message(outcome: Result<String, WorkflowError>) -> String {
    match outcome {
        Ok(result) => result,
        Err(err) if err.is_transport() => format!("error: {err}"),
        Err(err) => err.to_string(),
    }
}
