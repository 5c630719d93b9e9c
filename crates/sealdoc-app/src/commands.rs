// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Clap command tree for the `sealdoc` binary.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("sealdoc")
        .about("Generate official documents and stamp existing PDFs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("JSON configuration file (environment variables override it)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(build_document())
        .subcommand(build_stamp())
        .subcommand(build_query())
}

// =========================================================================
// document
// =========================================================================

fn build_document() -> Command {
    Command::new("document")
        .about("Lay out a one-page official document and write it as PDF")
        .arg(text_arg("number", "Document number, e.g. 2024-001"))
        .arg(text_arg("title", "Document title"))
        .arg(text_arg("recipient", "Recipient name"))
        .arg(text_arg("honorific", "Form of address appended to the name"))
        .arg(
            Arg::new("body")
                .long("body")
                .help("Body text; newlines separate paragraphs")
                .conflicts_with("body-file"),
        )
        .arg(
            Arg::new("body-file")
                .long("body-file")
                .help("Read the body text from a file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(text_arg("handler", "Handling officer"))
        .arg(text_arg("phone", "Contact phone number"))
        .arg(
            Arg::new("stamp")
                .long("stamp")
                .help("Stamp image drawn at the stamp position (placeholder when absent)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory the PDF is written to (default: from configuration)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("labels")
                .long("labels")
                .help("Label wording: zh or en (default: from configuration)"),
        )
}

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help).default_value("")
}

// =========================================================================
// stamp
// =========================================================================

fn build_stamp() -> Command {
    Command::new("stamp")
        .about("Overlay a stamp image onto one page of an existing PDF")
        .arg(
            Arg::new("pdf")
                .help("PDF file to stamp")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .help("Stamp image (default: from configuration)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(mm_arg("x", "150", "Left edge of the stamp, mm from the page's left edge"))
        .arg(mm_arg("y", "200", "Top edge of the stamp, mm from the page's top edge"))
        .arg(mm_arg("size", "40", "Side length of the square stamp, mm"))
        .arg(
            Arg::new("page")
                .long("page")
                .help("Page to stamp, starting at 1")
                .value_parser(value_parser!(u32))
                .default_value("1"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file (default: overwrite the input)")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn mm_arg(name: &'static str, default: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value(default)
}

// =========================================================================
// query
// =========================================================================

fn build_query() -> Command {
    Command::new("query")
        .about("Ask the drafting workflow to produce document text for a case")
        .arg(
            Arg::new("text")
                .help("Case description")
                .required(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .help("User identifier reported to the workflow service"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds (default: from configuration)")
                .value_parser(value_parser!(u64)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }
}
