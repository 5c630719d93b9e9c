// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ArgMatches → CliAction conversion. Configuration supplies every default
// the command line leaves open.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use sealdoc_core::{AppConfig, DocumentRequest, LabelSet, Rectangle};

/// What the user asked for.
#[derive(Debug)]
pub enum CliAction {
    Document {
        request: DocumentRequest,
        labels: LabelSet,
    },
    Stamp(StampArgs),
    Query {
        text: String,
        user: Option<String>,
        timeout: Duration,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StampArgs {
    pub pdf: PathBuf,
    pub image: PathBuf,
    pub target: Rectangle,
    pub page: u32,
    pub output: Option<PathBuf>,
}

pub fn matches_to_action(matches: &ArgMatches, config: &AppConfig) -> Result<CliAction, String> {
    match matches.subcommand() {
        Some(("document", sub)) => parse_document(sub, config),
        Some(("stamp", sub)) => parse_stamp(sub, config),
        Some(("query", sub)) => Ok(CliAction::Query {
            text: string(sub, "text"),
            user: sub.get_one::<String>("user").cloned(),
            timeout: Duration::from_secs(
                sub.get_one::<u64>("timeout")
                    .copied()
                    .unwrap_or(config.workflow_timeout_secs),
            ),
        }),
        Some((other, _)) => Err(format!("unknown command '{other}'")),
        None => Err("no command given".to_string()),
    }
}

fn parse_document(sub: &ArgMatches, config: &AppConfig) -> Result<CliAction, String> {
    let body = match sub.get_one::<PathBuf>("body-file") {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("cannot read body file {}: {err}", path.display()))?,
        None => string(sub, "body"),
    };
    let labels = match sub.get_one::<String>("labels") {
        Some(value) => value.parse::<LabelSet>()?,
        None => config.labels,
    };

    let request = DocumentRequest {
        document_number: string(sub, "number"),
        title: string(sub, "title"),
        recipient_name: string(sub, "recipient"),
        recipient_honorific: string(sub, "honorific"),
        body,
        handler_name: string(sub, "handler"),
        contact_phone: string(sub, "phone"),
        stamp_image: sub.get_one::<PathBuf>("stamp").cloned(),
        output_dir: sub
            .get_one::<PathBuf>("output-dir")
            .cloned()
            .unwrap_or_else(|| config.output_dir.clone()),
    };
    Ok(CliAction::Document { request, labels })
}

fn parse_stamp(sub: &ArgMatches, config: &AppConfig) -> Result<CliAction, String> {
    let number = |name: &str| sub.get_one::<f64>(name).copied().unwrap_or_default();
    let target = Rectangle::new(number("x"), number("y"), number("size"));
    target.validate().map_err(|err| err.to_string())?;

    Ok(CliAction::Stamp(StampArgs {
        pdf: sub.get_one::<PathBuf>("pdf").cloned().unwrap_or_default(),
        image: sub
            .get_one::<PathBuf>("image")
            .cloned()
            .unwrap_or_else(|| config.default_stamp_image.clone()),
        target,
        page: sub.get_one::<u32>("page").copied().unwrap_or(1),
        output: sub.get_one::<PathBuf>("output").cloned(),
    }))
}

fn string(matches: &ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    fn parse(args: &[&str]) -> Result<CliAction, String> {
        let matches = build_cli()
            .try_get_matches_from(std::iter::once("sealdoc").chain(args.iter().copied()))
            .map_err(|err| err.to_string())?;
        matches_to_action(&matches, &AppConfig::default())
    }

    #[test]
    fn document_fields_map_onto_request() {
        let action = parse(&[
            "document",
            "--number",
            "2024-001",
            "--title",
            "Notice",
            "--recipient",
            "Zhang",
            "--honorific",
            "Mr.",
            "--body",
            "Para one.\n\nPara two.",
            "--handler",
            "Li",
            "--phone",
            "555-0100",
            "--output-dir",
            "/tmp/docs",
            "--labels",
            "en",
        ])
        .expect("parse");

        let CliAction::Document { request, labels } = action else {
            panic!("expected document action");
        };
        assert_eq!(labels, LabelSet::English);
        assert_eq!(request.document_number, "2024-001");
        assert_eq!(request.recipient_honorific, "Mr.");
        assert_eq!(request.body, "Para one.\n\nPara two.");
        assert_eq!(request.output_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(request.stamp_image, None);
    }

    #[test]
    fn document_defaults_come_from_config() {
        let CliAction::Document { request, labels } = parse(&["document"]).expect("parse") else {
            panic!("expected document action");
        };
        let config = AppConfig::default();
        assert_eq!(labels, config.labels);
        assert_eq!(request.output_dir, config.output_dir);
        assert!(request.body.is_empty());
    }

    #[test]
    fn body_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("body.txt");
        std::fs::write(&path, "First.\nSecond.").expect("write");
        let CliAction::Document { request, .. } =
            parse(&["document", "--body-file", path.to_str().expect("utf-8")]).expect("parse")
        else {
            panic!("expected document action");
        };
        assert_eq!(request.body, "First.\nSecond.");
    }

    #[test]
    fn stamp_defaults_match_tool_defaults() {
        let CliAction::Stamp(args) = parse(&["stamp", "in.pdf"]).expect("parse") else {
            panic!("expected stamp action");
        };
        assert_eq!(args.pdf, PathBuf::from("in.pdf"));
        assert_eq!(args.image, AppConfig::default().default_stamp_image);
        assert_eq!(args.target, Rectangle::new(150.0, 200.0, 40.0));
        assert_eq!(args.page, 1);
        assert_eq!(args.output, None);
    }

    #[test]
    fn stamp_accepts_negative_offsets_but_not_empty_size() {
        let CliAction::Stamp(args) =
            parse(&["stamp", "in.pdf", "--x", "-5", "--page", "2", "-o", "out.pdf"]).expect("parse")
        else {
            panic!("expected stamp action");
        };
        assert_eq!(args.target.left, -5.0);
        assert_eq!(args.page, 2);
        assert_eq!(args.output, Some(PathBuf::from("out.pdf")));

        let err = parse(&["stamp", "in.pdf", "--size", "0"]).unwrap_err();
        assert!(err.contains("greater than zero"));
    }

    #[test]
    fn stamp_rejects_non_finite_numbers() {
        for args in [
            ["stamp", "in.pdf", "--size", "inf"],
            ["stamp", "in.pdf", "--size", "NaN"],
            ["stamp", "in.pdf", "--x", "inf"],
            ["stamp", "in.pdf", "--y", "NaN"],
        ] {
            let err = parse(&args).unwrap_err();
            assert!(err.starts_with("invalid stamp target"), "{args:?}: {err}");
        }
    }

    #[test]
    fn query_timeout_defaults_to_config() {
        let CliAction::Query { text, user, timeout } =
            parse(&["query", "expired food found"]).expect("parse")
        else {
            panic!("expected query action");
        };
        assert_eq!(text, "expired food found");
        assert_eq!(user, None);
        assert_eq!(timeout, Duration::from_secs(AppConfig::default().workflow_timeout_secs));
    }

    #[test]
    fn unknown_label_set_is_rejected() {
        let err = parse(&["document", "--labels", "fr"]).unwrap_err();
        assert!(err.contains("unknown label set"));
    }
}
