// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Sealdoc.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Paper the documents are laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
        }
    }
}

/// Everything needed to lay out one official document.
///
/// Empty strings are rendered as empty text rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Reference number, e.g. "2024-001".
    pub document_number: String,
    pub title: String,
    pub recipient_name: String,
    /// Form of address appended to the name ("先生", "女士", "Mr." ...).
    pub recipient_honorific: String,
    /// Body text; `\n` separates paragraphs, a blank line adds vertical space.
    pub body: String,
    pub handler_name: String,
    pub contact_phone: String,
    /// Stamp raster to place at the anchor. Missing files fall back to a
    /// placeholder.
    pub stamp_image: Option<PathBuf>,
    /// Directory the finished document is written into.
    pub output_dir: PathBuf,
}

/// Fixed wording printed around the caller's data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSet {
    /// Simplified Chinese wording; needs a CJK-capable font.
    #[default]
    Chinese,
    /// Latin-1 wording, renderable with the builtin PDF fonts.
    English,
}

impl LabelSet {
    pub fn document_number(&self) -> &'static str {
        match self {
            Self::Chinese => "编号: ",
            Self::English => "No.: ",
        }
    }

    /// Appended after "{name}{honorific}".
    pub fn recipient_suffix(&self) -> &'static str {
        match self {
            Self::Chinese => "：",
            Self::English => ":",
        }
    }

    pub fn handler(&self) -> &'static str {
        match self {
            Self::Chinese => "经办（联系）人：",
            Self::English => "Handler: ",
        }
    }

    pub fn phone(&self) -> &'static str {
        match self {
            Self::Chinese => "联 系 电 话：",
            Self::English => "Phone: ",
        }
    }

    pub fn stamp_placeholder(&self) -> &'static str {
        match self {
            Self::Chinese => "(盖章处)",
            Self::English => "(stamp here)",
        }
    }

    /// `chrono` format string for the date line.
    pub fn date_format(&self) -> &'static str {
        match self {
            Self::Chinese => "%Y年%m月%d日",
            Self::English => "%Y-%m-%d",
        }
    }
}

impl std::str::FromStr for LabelSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "chinese" => Ok(Self::Chinese),
            "en" | "english" => Ok(Self::English),
            other => Err(format!("unknown label set '{other}' (expected zh or en)")),
        }
    }
}
