// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sealdoc-workflow: client for the hosted workflow service that drafts
// document text from a free-form case description.
//
// One blocking-mode workflow run per query: the query goes in as the
// `query` input, the `result` output comes back.

pub mod client;
pub mod error;

pub use client::{DEFAULT_USER, WorkflowClient, query_message};
pub use error::WorkflowError;
