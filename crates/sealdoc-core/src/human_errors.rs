// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-facing error messages.
//
// The tool surface never lets an error escape as a fault: every
// `SealdocError` is turned into a plain message plus a suggestion.

use crate::error::SealdocError;

/// Who has to act to get past the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The caller must change an input (page number, image, path).
    InputProblem,
    /// The host needs setting up (fonts, credentials, permissions).
    Environment,
    /// Something inside Sealdoc went wrong.
    Internal,
}

/// A caller-facing error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {} {}", self.message, self.suggestion)
    }
}

/// Convert a `SealdocError` into a report a caller can act on.
pub fn describe_error(err: &SealdocError) -> ErrorReport {
    match err {
        SealdocError::Config(detail) => ErrorReport {
            message: format!("Sealdoc is not configured correctly ({detail})."),
            suggestion: "Check the configuration file and the SEALDOC_* / WORKFLOW_* environment variables.".into(),
            severity: Severity::Environment,
        },

        SealdocError::FontUnavailable(detail) => ErrorReport {
            message: format!("No font could be loaded for the document ({detail})."),
            suggestion: "Install a CJK font such as fonts-wqy-zenhei, or point SEALDOC_FONT_PATH at a .ttf/.ttc file.".into(),
            severity: Severity::Environment,
        },

        SealdocError::Render(detail) => ErrorReport {
            message: format!("The document could not be drawn ({detail})."),
            suggestion: "Remove characters the configured font cannot display, or configure a font that covers them.".into(),
            severity: Severity::InputProblem,
        },

        SealdocError::ImageDecode(detail) => ErrorReport {
            message: format!("The stamp image could not be read ({detail})."),
            suggestion: "Use a PNG or JPEG file; PNG keeps transparent areas transparent.".into(),
            severity: Severity::InputProblem,
        },

        SealdocError::InvalidTarget(detail) => ErrorReport {
            message: format!("The stamp position is not usable ({detail})."),
            suggestion: "Give finite x and y values and a size greater than zero, in millimetres.".into(),
            severity: Severity::InputProblem,
        },

        SealdocError::PageIndex {
            requested,
            page_count,
        } => ErrorReport {
            message: format!("Page {requested} does not exist; the document has {page_count} pages."),
            suggestion: "Choose a page number between 1 and the page count.".into(),
            severity: Severity::InputProblem,
        },

        SealdocError::Pdf(detail) => ErrorReport {
            message: format!("The PDF file could not be processed ({detail})."),
            suggestion: "The file may be damaged or encrypted. Try re-saving it from a PDF viewer.".into(),
            severity: Severity::InputProblem,
        },

        SealdocError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => ErrorReport {
                message: "A file could not be found.".into(),
                suggestion: format!("Check the path and try again. ({io_err})"),
                severity: Severity::InputProblem,
            },
            std::io::ErrorKind::PermissionDenied => ErrorReport {
                message: "Sealdoc does not have permission to use that file.".into(),
                suggestion: format!("Check the file and directory permissions. ({io_err})"),
                severity: Severity::Environment,
            },
            _ => ErrorReport {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: format!("Check there is free disk space and try again. ({io_err})"),
                severity: Severity::Environment,
            },
        },

        SealdocError::Serialization(detail) => ErrorReport {
            message: format!("Some data could not be parsed ({detail})."),
            suggestion: "Check the JSON configuration file for typos.".into(),
            severity: Severity::Internal,
        },
    }
}
