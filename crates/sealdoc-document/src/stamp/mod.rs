// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stamp module: overlay a raster onto a page of an existing PDF.

pub mod compositor;
pub mod overlay;

pub use compositor::{composite, composite_bytes};
pub use overlay::OverlayPlan;
