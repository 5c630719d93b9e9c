// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workflow client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow API key is not configured (set WORKFLOW_API_KEY)")]
    MissingApiKey,

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("workflow returned an empty result. Raw response: {0}")]
    EmptyResult(serde_json::Value),

    #[error("unexpected workflow response: {0}")]
    UnexpectedResponse(serde_json::Value),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl WorkflowError {
    /// Whether the failure happened before or during transport, as opposed
    /// to the service answering with something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::Timeout(_) | Self::Status { .. } | Self::Http(_)
        )
    }
}
