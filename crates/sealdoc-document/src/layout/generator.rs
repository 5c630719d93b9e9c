// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document generator: plan, render and persist one official document.

use std::path::PathBuf;

use chrono::NaiveDate;
use sealdoc_core::error::Result;
use sealdoc_core::{DocumentRequest, LabelSet, Rectangle};
use tracing::{info, instrument};

use super::engine::{LayoutEngine, PAGE, StampOutcome};
use crate::fonts::FontSource;
use crate::output::{unique_document_path, write_atomically};
use crate::pdf::PdfWriter;

/// A document written to disk by [`DocumentGenerator::generate`].
#[derive(Debug)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// Where the stamp sits (or should sit), in Document Space.
    pub anchor: Rectangle,
    pub stamp: StampOutcome,
}

/// Generates official documents with one resolved font and label set.
pub struct DocumentGenerator {
    font: FontSource,
    labels: LabelSet,
    /// Fixed issue date; today's date when `None`.
    date: Option<NaiveDate>,
}

impl DocumentGenerator {
    pub fn new(font: FontSource, labels: LabelSet) -> Self {
        Self {
            font,
            labels,
            date: None,
        }
    }

    /// Print `date` on every document instead of the current date.
    pub fn with_date(self, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..self
        }
    }

    /// Lay out `request`, render it and write it under `request.output_dir`.
    ///
    /// Fails with `Render` before anything is written if a glyph cannot be
    /// encoded in the active font.
    #[instrument(skip_all, fields(number = %request.document_number, dir = %request.output_dir.display()))]
    pub fn generate(&self, request: &DocumentRequest) -> Result<GeneratedDocument> {
        let engine = LayoutEngine::new(&self.font, self.labels);
        let engine = match self.date {
            Some(date) => engine.with_date(date),
            None => engine,
        };
        let plan = engine.plan(request);

        let mut writer = PdfWriter::new(PAGE);
        if !request.title.is_empty() {
            writer.set_title(request.title.as_str());
        }
        let bytes = writer.render(&plan.program, &self.font)?;

        let path = unique_document_path(&request.output_dir);
        write_atomically(&path, &bytes)?;

        info!(
            path = %path.display(),
            anchor = %plan.anchor,
            stamp = ?plan.stamp,
            bytes = bytes.len(),
            "Document generated"
        );

        Ok(GeneratedDocument {
            path,
            bytes,
            anchor: plan.anchor,
            stamp: plan.stamp,
        })
    }
}
