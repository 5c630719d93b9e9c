// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate model shared by the layout engine and the stamp compositor.
//
// Document Space: millimetres, origin top-left, y grows downward.
// Page Native Space: PDF points, origin bottom-left, y grows upward.
//
// Every conversion between the two goes through this module.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SealdocError};

/// PDF points per millimetre (72 points per inch, 25.4 mm per inch).
pub const UNITS_PER_MM: f64 = 72.0 / 25.4;

/// Corner a coordinate space measures from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    TopLeft,
    BottomLeft,
}

/// Length unit of a coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Millimetre,
    Point,
}

/// The two frames positions can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// Layout frame: millimetres from the top-left corner.
    Document,
    /// PDF frame: points from the bottom-left corner.
    PageNative,
}

impl CoordinateSpace {
    pub fn origin(&self) -> Origin {
        match self {
            Self::Document => Origin::TopLeft,
            Self::PageNative => Origin::BottomLeft,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Self::Document => Unit::Millimetre,
            Self::PageNative => Unit::Point,
        }
    }
}

/// A square region in Document Space, in millimetres.
///
/// Used both as the anchor returned by the layout engine and as the stamp
/// target handed to the compositor. `left` and `top` are not clamped; a
/// negative value places the square partly off the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

impl Rectangle {
    pub const SPACE: CoordinateSpace = CoordinateSpace::Document;

    pub fn new(left: f64, top: f64, size: f64) -> Self {
        Self { left, top, size }
    }

    /// Square of side `2 * radius` around a centre point.
    pub fn around_centre(centre_x: f64, centre_y: f64, radius: f64) -> Self {
        Self {
            left: centre_x - radius,
            top: centre_y - radius,
            size: radius * 2.0,
        }
    }

    pub fn centre(&self) -> (f64, f64) {
        let half = self.size / 2.0;
        (self.left + half, self.top + half)
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.size
    }

    /// The `(left, top, size)` triple reported to callers.
    pub fn as_triple(&self) -> (f64, f64, f64) {
        (self.left, self.top, self.size)
    }

    /// Reject non-finite coordinates and sizes that are not positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.left.is_finite() && self.top.is_finite() && self.size.is_finite()) {
            return Err(SealdocError::InvalidTarget(format!(
                "coordinates must be finite numbers, got {self}"
            )));
        }
        if self.size <= 0.0 {
            return Err(SealdocError::InvalidTarget(format!(
                "size must be greater than zero, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.left, self.top, self.size)
    }
}

/// A square region in Page Native Space, in points, anchored at its
/// bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl PageRect {
    pub const SPACE: CoordinateSpace = CoordinateSpace::PageNative;
}

/// Convert a length in millimetres to points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * UNITS_PER_MM
}

/// Convert a length in points to millimetres.
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / UNITS_PER_MM
}

/// Map a Document Space square onto a page of the given height.
pub fn to_page_space(rect: Rectangle, page_height_mm: f64) -> PageRect {
    PageRect {
        x: rect.left * UNITS_PER_MM,
        y: (page_height_mm - rect.top - rect.size) * UNITS_PER_MM,
        size: rect.size * UNITS_PER_MM,
    }
}

/// Inverse of [`to_page_space`].
pub fn from_page_space(rect: PageRect, page_height_mm: f64) -> Rectangle {
    let size = rect.size / UNITS_PER_MM;
    Rectangle {
        left: rect.x / UNITS_PER_MM,
        top: page_height_mm - rect.y / UNITS_PER_MM - size,
        size,
    }
}

/// Map a single Document Space point to Page Native Space `(x, y)` points.
pub fn to_page_point(x_mm: f64, y_mm: f64, page_height_mm: f64) -> (f64, f64) {
    (x_mm * UNITS_PER_MM, (page_height_mm - y_mm) * UNITS_PER_MM)
}
