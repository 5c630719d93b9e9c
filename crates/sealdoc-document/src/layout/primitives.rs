// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Draw primitives: the layout engine's output. Every primitive is placed in
// Document Space (millimetres, top-left origin) and carries its own style, so
// nothing depends on state left behind by an earlier primitive.

use std::sync::Arc;

use crate::raster::StampRaster;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Border decoration.
    pub const ACCENT: Color = Color::rgb(220, 50, 50);
    /// Stamp placeholder outline.
    pub const LIGHT_GREY: Color = Color::rgb(200, 200, 200);
    /// Stamp placeholder label.
    pub const GREY: Color = Color::rgb(150, 150, 150);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Outline colour and width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width_mm: f64,
}

impl Stroke {
    pub const DEFAULT: Stroke = Stroke {
        color: Color::BLACK,
        width_mm: 0.2,
    };
}

impl Default for Stroke {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Horizontal placement of text inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Centre,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f64,
    pub color: Color,
    pub align: Align,
}

impl TextStyle {
    pub fn new(size_pt: f64, align: Align) -> Self {
        Self {
            size_pt,
            color: Color::BLACK,
            align,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

/// Axis-aligned box in Document Space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMm {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxMm {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl From<sealdoc_core::Rectangle> for BoxMm {
    fn from(rect: sealdoc_core::Rectangle) -> Self {
        Self::new(rect.left, rect.top, rect.size, rect.size)
    }
}

/// One absolutely positioned drawing operation.
#[derive(Debug, Clone)]
pub enum DrawPrimitive {
    /// Single line of text inside a cell; the baseline is derived from the
    /// cell height and font size.
    TextRun {
        cell: BoxMm,
        text: String,
        style: TextStyle,
    },
    Rectangle {
        bounds: BoxMm,
        stroke: Stroke,
    },
    /// Ellipse inscribed in `bounds`.
    Ellipse {
        bounds: BoxMm,
        stroke: Stroke,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
    /// Raster stretched to fill `bounds`.
    Image {
        bounds: BoxMm,
        raster: Arc<StampRaster>,
    },
}

impl DrawPrimitive {
    /// Stroke used by outline primitives, `None` for text and images.
    pub fn stroke(&self) -> Option<Stroke> {
        match self {
            Self::Rectangle { stroke, .. }
            | Self::Ellipse { stroke, .. }
            | Self::Line { stroke, .. } => Some(*stroke),
            Self::TextRun { .. } | Self::Image { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TextRun { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Ordered drawing program for one page. Primitives are only ever appended.
#[derive(Debug, Clone, Default)]
pub struct DrawProgram {
    primitives: Vec<DrawPrimitive>,
}

impl DrawProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, primitives: impl IntoIterator<Item = DrawPrimitive>) {
        self.primitives.extend(primitives);
    }

    pub fn primitives(&self) -> &[DrawPrimitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// All text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(DrawPrimitive::text)
    }
}
