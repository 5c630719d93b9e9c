// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: reading existing PDFs and rendering new pages.

pub mod reader;
pub mod writer;

pub use reader::{MediaBox, PdfReader};
pub use writer::PdfWriter;
