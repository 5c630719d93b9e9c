// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sealdoc.

use thiserror::Error;

/// Top-level error type for all Sealdoc operations.
#[derive(Debug, Error)]
pub enum SealdocError {
    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    // -- Layout errors --
    #[error("no usable font: {0}")]
    FontUnavailable(String),

    #[error("rendering failed: {0}")]
    Render(String),

    // -- Compositing errors --
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("invalid stamp target: {0}")]
    InvalidTarget(String),

    #[error("page {requested} out of range (document has {page_count} pages)")]
    PageIndex { requested: u32, page_count: usize },

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SealdocError>;
