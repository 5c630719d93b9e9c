// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engine: turns a `DocumentRequest` into a single-page draw program
// and the stamp anchor.
//
// All geometry is in Document Space on a fixed A4 page. Each step is a pure
// function of the request and an explicit `Cursor`; it returns the
// primitives it adds and the cursor the next step starts from.

use std::sync::Arc;

use chrono::NaiveDate;
use sealdoc_core::{DocumentRequest, LabelSet, PaperSize, Rectangle};
use tracing::{debug, instrument, warn};

use super::primitives::{Align, BoxMm, Color, DrawPrimitive, DrawProgram, Stroke, TextStyle};
use super::wrap::wrap_paragraph;
use crate::fonts::FontSource;
use crate::raster::StampRaster;

/// Page every official document is laid out on.
pub const PAGE: PaperSize = PaperSize::A4;

const LEFT_MARGIN: f64 = 25.0;
/// Width of the text column (25 mm → 185 mm).
const COLUMN_WIDTH: f64 = 160.0;
const LINE_HEIGHT: f64 = 7.0;

const BORDER_LEFT_X: f64 = 8.0;
const BORDER_RIGHT_X: f64 = 202.0;
const BORDER_TOP_Y: f64 = 10.0;
const BORDER_BOTTOM_Y: f64 = 280.0;
const BORDER_WIDTH: f64 = 3.0;

const NUMBER_CELL: BoxMm = BoxMm {
    x: 150.0,
    y: 15.0,
    width: 40.0,
    height: 6.0,
};
const TITLE_CELL: BoxMm = BoxMm {
    x: LEFT_MARGIN,
    y: 30.0,
    width: COLUMN_WIDTH,
    height: 10.0,
};
const RECIPIENT_Y: f64 = 50.0;
/// First body line, independent of how tall the recipient line renders.
pub const CONTENT_START_Y: f64 = 62.0;

const FIRST_LINE_INDENT: f64 = 8.0;
const CONTENT_WIDTH: f64 = 155.0;
const PARAGRAPH_GAP: f64 = 2.0;

const STAMP_CENTRE_X: f64 = 165.0;
const STAMP_OFFSET_Y: f64 = 25.0;
const STAMP_RADIUS: f64 = 20.0;
const PLACEHOLDER_STROKE: Stroke = Stroke {
    color: Color::LIGHT_GREY,
    width_mm: 0.3,
};

const DATE_X: f64 = 140.0;
const DATE_OFFSET_Y: f64 = 55.0;
const DATE_WIDTH: f64 = 50.0;

const NUMBER_SIZE_PT: f64 = 10.0;
const TITLE_SIZE_PT: f64 = 18.0;
const BODY_SIZE_PT: f64 = 11.0;
const PLACEHOLDER_SIZE_PT: f64 = 8.0;
const DATE_SIZE_PT: f64 = 10.0;

/// Vertical layout position in Document Space millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f64,
}

impl Cursor {
    pub const fn at(y: f64) -> Self {
        Self { y }
    }

    #[must_use]
    pub fn advance(self, dy: f64) -> Self {
        Self { y: self.y + dy }
    }
}

/// What one layout step produced.
#[derive(Debug)]
pub struct Step {
    pub primitives: Vec<DrawPrimitive>,
    pub cursor: Cursor,
}

/// Which branch the stamp step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// The stamp raster was drawn into the anchor.
    Applied,
    /// No usable raster; a placeholder circle and label were drawn.
    Placeholder,
}

/// Output of [`LayoutEngine::plan`].
#[derive(Debug)]
pub struct PagePlan {
    pub program: DrawProgram,
    pub anchor: Rectangle,
    pub stamp: StampOutcome,
    /// Cursor after the body text; the stamp and date hang off it.
    pub content_end: Cursor,
}

/// Lays out official documents for one font and label set.
pub struct LayoutEngine<'a> {
    font: &'a FontSource,
    labels: LabelSet,
    date: NaiveDate,
}

impl<'a> LayoutEngine<'a> {
    /// Engine dated today (local time).
    pub fn new(font: &'a FontSource, labels: LabelSet) -> Self {
        Self {
            font,
            labels,
            date: chrono::Local::now().date_naive(),
        }
    }

    /// Print `date` instead of today's date.
    pub fn with_date(self, date: NaiveDate) -> Self {
        Self { date, ..self }
    }

    /// Lay out the whole page.
    #[instrument(skip_all, fields(number = %request.document_number))]
    pub fn plan(&self, request: &DocumentRequest) -> PagePlan {
        let mut program = DrawProgram::new();
        let mut append = |step: Step| {
            program.extend(step.primitives);
            step.cursor
        };

        let cursor = append(draw_border(Cursor::at(0.0)));
        let cursor = append(self.document_number(cursor, &request.document_number));
        let cursor = append(self.title(cursor, &request.title));
        let cursor = append(self.recipient(cursor, request));
        let content_end = append(self.body(cursor, &request.body));
        let cursor = append(self.contact(content_end, request));

        let anchor = stamp_anchor(cursor);
        let (stamp_step, stamp) = self.stamp(cursor, anchor, request);
        append(stamp_step);
        append(self.date_line(cursor));

        debug!(
            content_end = content_end.y,
            anchor = %anchor,
            ?stamp,
            primitives = program.len(),
            "Page planned"
        );

        PagePlan {
            program,
            anchor,
            stamp,
            content_end,
        }
    }

    fn document_number(&self, cursor: Cursor, number: &str) -> Step {
        Step {
            primitives: vec![DrawPrimitive::TextRun {
                cell: NUMBER_CELL,
                text: format!("{}{}", self.labels.document_number(), number),
                style: TextStyle::new(NUMBER_SIZE_PT, Align::Right),
            }],
            cursor,
        }
    }

    fn title(&self, cursor: Cursor, title: &str) -> Step {
        Step {
            primitives: vec![DrawPrimitive::TextRun {
                cell: TITLE_CELL,
                text: title.to_string(),
                style: TextStyle::new(TITLE_SIZE_PT, Align::Centre),
            }],
            cursor,
        }
    }

    /// Recipient line; the body always starts at [`CONTENT_START_Y`].
    fn recipient(&self, _cursor: Cursor, request: &DocumentRequest) -> Step {
        Step {
            primitives: vec![DrawPrimitive::TextRun {
                cell: BoxMm::new(LEFT_MARGIN, RECIPIENT_Y, COLUMN_WIDTH, LINE_HEIGHT),
                text: format!(
                    "{}{}{}",
                    request.recipient_name,
                    request.recipient_honorific,
                    self.labels.recipient_suffix()
                ),
                style: TextStyle::new(BODY_SIZE_PT, Align::Left),
            }],
            cursor: Cursor::at(CONTENT_START_Y),
        }
    }

    /// Body paragraphs. Blank lines add one line of space; each paragraph
    /// is followed by a fixed gap.
    fn body(&self, cursor: Cursor, body: &str) -> Step {
        let mut primitives = Vec::new();
        let mut cursor = cursor;

        if body.is_empty() {
            return Step { primitives, cursor };
        }

        for paragraph in body.split('\n') {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                cursor = cursor.advance(LINE_HEIGHT);
                continue;
            }

            let lines = wrap_paragraph(
                paragraph,
                CONTENT_WIDTH - FIRST_LINE_INDENT,
                CONTENT_WIDTH,
                self.font,
                BODY_SIZE_PT,
            );
            for (index, line) in lines.iter().enumerate() {
                let (x, width) = if index == 0 {
                    (LEFT_MARGIN + FIRST_LINE_INDENT, CONTENT_WIDTH - FIRST_LINE_INDENT)
                } else {
                    (LEFT_MARGIN, CONTENT_WIDTH)
                };
                primitives.push(DrawPrimitive::TextRun {
                    cell: BoxMm::new(x, cursor.y + index as f64 * LINE_HEIGHT, width, LINE_HEIGHT),
                    text: line.clone(),
                    style: TextStyle::new(BODY_SIZE_PT, Align::Left),
                });
            }
            cursor = cursor.advance(lines.len() as f64 * LINE_HEIGHT + PARAGRAPH_GAP);
        }

        Step { primitives, cursor }
    }

    /// Handler and phone lines below the body. Does not move the cursor.
    fn contact(&self, cursor: Cursor, request: &DocumentRequest) -> Step {
        let first = cursor.advance(LINE_HEIGHT);
        let second = first.advance(LINE_HEIGHT);
        let line = |y: f64, text: String| DrawPrimitive::TextRun {
            cell: BoxMm::new(LEFT_MARGIN, y, COLUMN_WIDTH, LINE_HEIGHT),
            text,
            style: TextStyle::new(BODY_SIZE_PT, Align::Left),
        };

        Step {
            primitives: vec![
                line(
                    first.y,
                    format!("{}{}", self.labels.handler(), request.handler_name),
                ),
                line(
                    second.y,
                    format!("{}{}", self.labels.phone(), request.contact_phone),
                ),
            ],
            cursor,
        }
    }

    /// Stamp raster at the anchor, or a placeholder when none is usable.
    fn stamp(
        &self,
        cursor: Cursor,
        anchor: Rectangle,
        request: &DocumentRequest,
    ) -> (Step, StampOutcome) {
        let raster = request.stamp_image.as_deref().and_then(|path| {
            if !path.is_file() {
                warn!(path = %path.display(), "Stamp image not found, drawing placeholder");
                return None;
            }
            match StampRaster::open(path) {
                Ok(raster) => Some(raster),
                Err(err) => {
                    warn!(path = %path.display(), %err, "Stamp image unusable, drawing placeholder");
                    None
                }
            }
        });

        if let Some(raster) = raster {
            let step = Step {
                primitives: vec![DrawPrimitive::Image {
                    bounds: anchor.into(),
                    raster: Arc::new(raster),
                }],
                cursor,
            };
            return (step, StampOutcome::Applied);
        }

        let (_, centre_y) = anchor.centre();
        let step = Step {
            primitives: vec![
                DrawPrimitive::Ellipse {
                    bounds: anchor.into(),
                    stroke: PLACEHOLDER_STROKE,
                },
                DrawPrimitive::TextRun {
                    cell: BoxMm::new(anchor.left, centre_y - 3.0, anchor.size, 6.0),
                    text: self.labels.stamp_placeholder().to_string(),
                    style: TextStyle::new(PLACEHOLDER_SIZE_PT, Align::Centre)
                        .with_color(Color::GREY),
                },
            ],
            cursor,
        };
        (step, StampOutcome::Placeholder)
    }

    /// Date line, positioned from the pre-stamp cursor.
    fn date_line(&self, cursor: Cursor) -> Step {
        Step {
            primitives: vec![DrawPrimitive::TextRun {
                cell: BoxMm::new(DATE_X, cursor.y + DATE_OFFSET_Y, DATE_WIDTH, 6.0),
                text: self.date.format(self.labels.date_format()).to_string(),
                style: TextStyle::new(DATE_SIZE_PT, Align::Centre),
            }],
            cursor,
        }
    }
}

/// Two accent-coloured vertical rules near the page edges.
pub fn draw_border(cursor: Cursor) -> Step {
    let stroke = Stroke {
        color: Color::ACCENT,
        width_mm: BORDER_WIDTH,
    };
    Step {
        primitives: [BORDER_LEFT_X, BORDER_RIGHT_X]
            .into_iter()
            .map(|x| DrawPrimitive::Line {
                from: (x, BORDER_TOP_Y),
                to: (x, BORDER_BOTTOM_Y),
                stroke,
            })
            .collect(),
        cursor,
    }
}

/// Square around the fixed-radius stamp circle hanging below `cursor`.
pub fn stamp_anchor(cursor: Cursor) -> Rectangle {
    Rectangle::around_centre(STAMP_CENTRE_X, cursor.y + STAMP_OFFSET_Y, STAMP_RADIUS)
}
