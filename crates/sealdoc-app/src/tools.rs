// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool implementations behind each subcommand. Every outcome, including
// failure, comes back as the text shown to the user.

use std::time::Duration;

use sealdoc_core::error::Result;
use sealdoc_core::human_errors::describe_error;
use sealdoc_core::{AppConfig, DocumentRequest, LabelSet};
use sealdoc_document::{DocumentGenerator, StampOutcome, composite, resolve_font};
use sealdoc_workflow::{WorkflowClient, WorkflowError, query_message};
use tracing::{info, warn};

use crate::parse::{CliAction, StampArgs};

/// Run one action. `Err` carries the message for stderr.
pub async fn run(action: CliAction, config: &AppConfig) -> std::result::Result<String, String> {
    match action {
        CliAction::Document { request, labels } => {
            generate_document(config, &request, labels).map_err(|err| describe_error(&err).to_string())
        }
        CliAction::Stamp(args) => add_stamp(&args).map_err(|err| describe_error(&err).to_string()),
        CliAction::Query {
            text,
            user,
            timeout,
        } => {
            let outcome = query_workflow(config, &text, user.as_deref(), timeout).await;
            match outcome {
                Ok(result) => Ok(result),
                Err(err) if err.is_transport() => Err(query_message(Err(err))),
                Err(err) => Ok(query_message(Err(err))),
            }
        }
    }
}

/// Generate a document and describe where it went and where the stamp sits.
pub fn generate_document(
    config: &AppConfig,
    request: &DocumentRequest,
    labels: LabelSet,
) -> Result<String> {
    let font = resolve_font(&config.font_candidates, config.builtin_font_fallback)?;
    let generated = DocumentGenerator::new(font, labels).generate(request)?;
    if generated.stamp == StampOutcome::Placeholder && request.stamp_image.is_some() {
        warn!("Stamp image could not be used; the document carries a placeholder");
    }
    Ok(format!(
        "PDF document generated: {}, stamp position: {}",
        generated.path.display(),
        generated.anchor
    ))
}

/// Stamp an existing PDF and report the file written.
pub fn add_stamp(args: &StampArgs) -> Result<String> {
    let image = std::fs::read(&args.image)?;
    let written = composite(&args.pdf, args.page, args.target, &image, args.output.as_deref())?;
    info!(output = %written.display(), "Stamp tool finished");
    Ok(format!("Stamp applied: {}", written.display()))
}

pub async fn query_workflow(
    config: &AppConfig,
    text: &str,
    user: Option<&str>,
    timeout: Duration,
) -> std::result::Result<String, WorkflowError> {
    let client = WorkflowClient::from_config(config)?;
    client.query(text, user, timeout).await
}
