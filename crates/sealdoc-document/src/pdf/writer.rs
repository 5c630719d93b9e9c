// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: render a `DrawProgram` onto a single page using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Each primitive is emitted inside its own saved
// graphics state, so colours and line widths never carry over.

use sealdoc_core::PaperSize;
use sealdoc_core::error::Result;
use sealdoc_core::geometry::{mm_to_pt, to_page_point};
use printpdf::{
    BuiltinFont, Color, FontId, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Pt, RawImage, RawImageData, RawImageFormat, Rgb, TextItem,
    XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::fonts::FontSource;
use crate::layout::primitives::{Align, BoxMm, Color as LayoutColor, DrawPrimitive, DrawProgram, Stroke};

/// Horizontal padding inside a left- or right-aligned text cell.
const CELL_PADDING_MM: f64 = 1.0;
/// Baseline drop below the cell's vertical centre, as a fraction of the font size.
const BASELINE_FACTOR: f64 = 0.3;
/// Points on the polyline approximating an ellipse.
const ELLIPSE_SEGMENTS: usize = 72;

/// Font as registered with the document being built.
#[derive(Clone)]
enum FontHandle {
    Builtin(BuiltinFont),
    Embedded(FontId),
}

/// Renders draw programs into single-page PDF documents.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn page_height_mm(&self) -> f64 {
        f64::from(self.paper_size.dimensions_mm().1)
    }

    /// Render `program` onto one page and serialise the document.
    ///
    /// Fails with `Render` when a text run contains a character the font
    /// cannot encode; nothing is emitted in that case.
    #[instrument(skip(self, program, font), fields(primitives = program.len(), font = %font.describe()))]
    pub fn render(&self, program: &DrawProgram, font: &FontSource) -> Result<Vec<u8>> {
        for text in program.texts() {
            font.ensure_encodable(text)?;
        }

        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        let title = self.title.as_deref().unwrap_or("Sealdoc Document");
        info!(paper = ?self.paper_size, title, "Rendering page");

        let mut doc = PdfDocument::new(title);
        let handle = match font {
            FontSource::Builtin { font: builtin, .. } => FontHandle::Builtin(builtin.clone()),
            FontSource::Embedded { font, .. } => FontHandle::Embedded(doc.add_font(font.as_ref())),
        };

        let mut ops: Vec<Op> = Vec::new();
        for primitive in program.primitives() {
            ops.push(Op::SaveGraphicsState);
            match primitive {
                DrawPrimitive::TextRun { cell, text, style } => {
                    if !text.is_empty() {
                        let width_mm = font.text_width_mm(text, style.size_pt);
                        let (x, y) = self.text_origin(*cell, width_mm, style.size_pt, style.align);
                        ops.push(Op::SetFillColor {
                            col: pdf_color(style.color),
                        });
                        ops.extend(text_ops(&handle, text, x, y, style.size_pt));
                    }
                }
                DrawPrimitive::Line { from, to, stroke } => {
                    ops.extend(stroke_ops(*stroke));
                    ops.push(self.polyline(&[*from, *to], false));
                }
                DrawPrimitive::Rectangle { bounds, stroke } => {
                    ops.extend(stroke_ops(*stroke));
                    let corners = [
                        (bounds.x, bounds.y),
                        (bounds.x + bounds.width, bounds.y),
                        (bounds.x + bounds.width, bounds.bottom()),
                        (bounds.x, bounds.bottom()),
                    ];
                    ops.push(self.polyline(&corners, true));
                }
                DrawPrimitive::Ellipse { bounds, stroke } => {
                    ops.extend(stroke_ops(*stroke));
                    ops.push(self.polyline(&ellipse_points(*bounds), true));
                }
                DrawPrimitive::Image { bounds, raster } => {
                    let raw = RawImage {
                        pixels: RawImageData::U8(raster.to_rgba()),
                        width: raster.width() as usize,
                        height: raster.height() as usize,
                        data_format: RawImageFormat::RGBA8,
                        tag: Vec::new(),
                    };
                    let id = doc.add_image(&raw);
                    // At 72 dpi one pixel is one point before scaling.
                    let (x, y) = to_page_point(bounds.x, bounds.bottom(), self.page_height_mm());
                    ops.push(Op::UseXobject {
                        id,
                        transform: XObjectTransform {
                            translate_x: Some(Pt(x as f32)),
                            translate_y: Some(Pt(y as f32)),
                            scale_x: Some((mm_to_pt(bounds.width) / f64::from(raster.width())) as f32),
                            scale_y: Some((mm_to_pt(bounds.height) / f64::from(raster.height())) as f32),
                            dpi: Some(72.0),
                            rotate: None,
                        },
                    });
                }
            }
            ops.push(Op::RestoreGraphicsState);
        }

        let op_count = ops.len();
        doc.with_pages(vec![PdfPage::new(Mm(w_mm as f32), Mm(h_mm as f32), ops)]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        debug!(op_count, bytes = output.len(), "Page serialised");
        Ok(output)
    }

    /// Baseline origin of a text run, in points.
    fn text_origin(&self, cell: BoxMm, text_width_mm: f64, size_pt: f64, align: Align) -> (f64, f64) {
        let x_mm = match align {
            Align::Left => cell.x + CELL_PADDING_MM,
            Align::Right => cell.x + cell.width - CELL_PADDING_MM - text_width_mm,
            Align::Centre => cell.x + (cell.width - text_width_mm) / 2.0,
        };
        let size_mm = sealdoc_core::geometry::pt_to_mm(size_pt);
        let baseline_mm = cell.y + cell.height / 2.0 + BASELINE_FACTOR * size_mm;
        to_page_point(x_mm, baseline_mm, self.page_height_mm())
    }

    fn polyline(&self, points: &[(f64, f64)], is_closed: bool) -> Op {
        let page_height_mm = self.page_height_mm();
        Op::DrawLine {
            line: Line {
                points: points
                    .iter()
                    .map(|&(x_mm, y_mm)| {
                        let (x, y) = to_page_point(x_mm, y_mm, page_height_mm);
                        LinePoint {
                            p: Point {
                                x: Pt(x as f32),
                                y: Pt(y as f32),
                            },
                            bezier: false,
                        }
                    })
                    .collect(),
                is_closed,
            },
        }
    }
}

fn pdf_color(color: LayoutColor) -> Color {
    let channel = |v: u8| f32::from(v) / 255.0;
    Color::Rgb(Rgb::new(channel(color.r), channel(color.g), channel(color.b), None))
}

fn stroke_ops(stroke: Stroke) -> [Op; 2] {
    [
        Op::SetOutlineColor {
            col: pdf_color(stroke.color),
        },
        Op::SetOutlineThickness {
            pt: Pt(mm_to_pt(stroke.width_mm) as f32),
        },
    ]
}

fn text_ops(font: &FontHandle, text: &str, x: f64, y: f64, size_pt: f64) -> Vec<Op> {
    let size = Pt(size_pt as f32);
    let items = vec![TextItem::Text(text.to_string())];
    let (set_size, write) = match font {
        FontHandle::Builtin(builtin) => (
            Op::SetFontSizeBuiltinFont {
                size,
                font: builtin.clone(),
            },
            Op::WriteTextBuiltinFont {
                items,
                font: builtin.clone(),
            },
        ),
        FontHandle::Embedded(id) => (
            Op::SetFontSize {
                size,
                font: id.clone(),
            },
            Op::WriteText {
                items,
                font: id.clone(),
            },
        ),
    };

    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Pt(x as f32),
                y: Pt(y as f32),
            },
        },
        set_size,
        write,
        Op::EndTextSection,
    ]
}

/// Closed polyline inscribed in `bounds`, Document Space.
fn ellipse_points(bounds: BoxMm) -> Vec<(f64, f64)> {
    let (rx, ry) = (bounds.width / 2.0, bounds.height / 2.0);
    let (cx, cy) = (bounds.x + rx, bounds.y + ry);
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
            (cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::primitives::TextStyle;
    use crate::raster::StampRaster;
    use sealdoc_core::SealdocError;
    use std::sync::Arc;

    fn text(content: &str) -> DrawPrimitive {
        DrawPrimitive::TextRun {
            cell: BoxMm::new(25.0, 30.0, 160.0, 10.0),
            text: content.to_string(),
            style: TextStyle::new(11.0, Align::Left),
        }
    }

    fn has_image_xobject(doc: &lopdf::Document) -> bool {
        doc.objects.values().any(|object| match object {
            lopdf::Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|v| v.as_name())
                .is_ok_and(|name| name == b"Image"),
            _ => false,
        })
    }

    #[test]
    fn renders_single_page() {
        let mut program = DrawProgram::new();
        program.extend([
            text("Notice"),
            DrawPrimitive::Rectangle {
                bounds: BoxMm::new(20.0, 20.0, 50.0, 30.0),
                stroke: Stroke::DEFAULT,
            },
            DrawPrimitive::Ellipse {
                bounds: BoxMm::new(145.0, 67.0, 40.0, 40.0),
                stroke: Stroke::DEFAULT,
            },
        ]);

        let bytes = PdfWriter::a4()
            .render(&program, &FontSource::builtin())
            .expect("render");
        let doc = lopdf::Document::load_mem(&bytes).expect("valid pdf");
        assert_eq!(doc.get_pages().len(), 1);
        assert!(!has_image_xobject(&doc));
    }

    #[test]
    fn unencodable_glyph_is_render_error() {
        let mut program = DrawProgram::new();
        program.extend([text("编号")]);
        let err = PdfWriter::a4()
            .render(&program, &FontSource::builtin())
            .unwrap_err();
        assert!(matches!(err, SealdocError::Render(_)));
    }

    #[test]
    fn image_primitive_embeds_xobject() {
        let raster = StampRaster::decode(&crate::raster::tests::opaque_png()).expect("decode");
        let mut program = DrawProgram::new();
        program.extend([DrawPrimitive::Image {
            bounds: BoxMm::new(145.0, 67.0, 40.0, 40.0),
            raster: Arc::new(raster),
        }]);

        let bytes = PdfWriter::a4()
            .render(&program, &FontSource::builtin())
            .expect("render");
        let doc = lopdf::Document::load_mem(&bytes).expect("valid pdf");
        assert!(has_image_xobject(&doc));
    }

    #[test]
    fn right_alignment_ends_inside_cell() {
        let writer = PdfWriter::a4();
        let cell = BoxMm::new(150.0, 15.0, 40.0, 6.0);
        let (x, _) = writer.text_origin(cell, 10.0, 10.0, Align::Right);
        assert!((x - mm_to_pt(179.0)).abs() < 1e-9);
        let (x, _) = writer.text_origin(cell, 10.0, 10.0, Align::Centre);
        assert!((x - mm_to_pt(165.0)).abs() < 1e-9);
    }

    #[test]
    fn ellipse_stays_within_bounds() {
        let bounds = BoxMm::new(145.0, 67.0, 40.0, 40.0);
        let points = ellipse_points(bounds);
        assert_eq!(points.len(), ELLIPSE_SEGMENTS);
        for (x, y) in points {
            assert!((145.0 - 1e-9..=185.0 + 1e-9).contains(&x));
            assert!((67.0 - 1e-9..=107.0 + 1e-9).contains(&y));
        }
    }
}
