// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module: official-document page layout and generation.

pub mod engine;
pub mod generator;
pub mod primitives;
pub mod wrap;

pub use engine::{LayoutEngine, PagePlan, StampOutcome};
pub use generator::{DocumentGenerator, GeneratedDocument};
pub use primitives::{DrawPrimitive, DrawProgram};
