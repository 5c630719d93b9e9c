// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sealdoc-document: official-document layout and PDF stamping for Sealdoc.
//
// Provides the layout engine (request → draw program → single-page PDF), the
// page writer built on `printpdf`, and the stamp compositor that overlays a
// raster onto an existing PDF page with `lopdf`.

pub mod fonts;
pub mod layout;
pub mod output;
pub mod pdf;
pub mod raster;
pub mod stamp;

// Re-export the primary entry points so callers can use `sealdoc_document::DocumentGenerator` etc.
pub use fonts::{FontSource, resolve_font};
pub use layout::{DocumentGenerator, GeneratedDocument, LayoutEngine, StampOutcome};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use raster::StampRaster;
pub use stamp::{composite, composite_bytes};
