// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution and text measurement for the layout engine.

use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, ParsedFont};
use sealdoc_core::error::{Result, SealdocError};
use sealdoc_core::geometry::pt_to_mm;
use tracing::{info, instrument, warn};

/// Fallback advance for a narrow glyph the font has no metrics for, in em.
const NARROW_GLYPH_EM: f64 = 0.5;
/// Fallback advance for an ideograph or full-width form, in em.
const WIDE_GLYPH_EM: f64 = 1.0;

/// The glyph source text is drawn with.
pub enum FontSource {
    /// One of the 14 standard PDF fonts. Covers Latin-1 only.
    ///
    /// `metrics` is the parsed face printpdf ships for the font, kept for
    /// glyph advances.
    Builtin {
        font: BuiltinFont,
        metrics: Option<Box<ParsedFont>>,
    },
    /// A TrueType/OpenType file embedded (subset) into the output.
    Embedded { path: PathBuf, font: Box<ParsedFont> },
}

impl FontSource {
    /// Builtin Helvetica, the fallback when no font file is available.
    pub fn builtin() -> Self {
        let font = BuiltinFont::Helvetica;
        let subset = font.get_subset_font();
        let mut parse_warnings = Vec::new();
        let metrics = ParsedFont::from_bytes(&subset.bytes, 0, &mut parse_warnings).map(Box::new);
        if metrics.is_none() {
            warn!(font = ?font, "Builtin font metrics unavailable, estimating text widths");
        }
        Self::Builtin { font, metrics }
    }

    /// Load a font file (`.ttf`, `.otf`, first face of a `.ttc`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut parse_warnings = Vec::new();
        let font = ParsedFont::from_bytes(&bytes, 0, &mut parse_warnings).ok_or_else(|| {
            SealdocError::FontUnavailable(format!("{} is not a usable font file", path.display()))
        })?;
        if !parse_warnings.is_empty() {
            warn!(path = %path.display(), warnings = parse_warnings.len(), "Font parsed with warnings");
        }
        Ok(Self::Embedded {
            path: path.to_path_buf(),
            font: Box::new(font),
        })
    }

    /// Short human-readable name for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Builtin { font, .. } => format!("builtin {:?}", font),
            Self::Embedded { path, .. } => path.display().to_string(),
        }
    }

    /// Whether `c` can be encoded with this font.
    pub fn supports(&self, c: char) -> bool {
        match self {
            // Builtin fonts are written with a single-byte encoding.
            Self::Builtin { .. } => matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF),
            Self::Embedded { font, .. } => {
                c == ' ' || font.lookup_glyph_index(c as u32).is_some()
            }
        }
    }

    /// Fail with `Render` on the first character the font cannot encode.
    pub fn ensure_encodable(&self, text: &str) -> Result<()> {
        match text.chars().find(|&c| !self.supports(c)) {
            None => Ok(()),
            Some(c) => Err(SealdocError::Render(format!(
                "character '{}' (U+{:04X}) in \"{}\" is not covered by font {}",
                c,
                c as u32,
                text,
                self.describe()
            ))),
        }
    }

    /// Rendered width of `text` at `size_pt`, in millimetres.
    ///
    /// Sums the font's horizontal advances. Kerning is ignored. Glyphs the
    /// font has no metrics for fall back to a per-class estimate.
    pub fn text_width_mm(&self, text: &str, size_pt: f64) -> f64 {
        let ems: f64 = text.chars().map(|c| self.advance_em(c)).sum();
        pt_to_mm(ems * size_pt)
    }

    fn metrics(&self) -> Option<&ParsedFont> {
        match self {
            Self::Builtin { metrics, .. } => metrics.as_deref(),
            Self::Embedded { font, .. } => Some(font.as_ref()),
        }
    }

    fn advance_em(&self, c: char) -> f64 {
        self.metrics()
            .and_then(|font| {
                let units_per_em = f64::from(font.font_metrics.units_per_em);
                if units_per_em <= 0.0 {
                    return None;
                }
                // Glyph 0 is .notdef: the font has no real glyph for `c`.
                let glyph = font.lookup_glyph_index(c as u32).filter(|&g| g != 0)?;
                Some(f64::from(font.get_horizontal_advance(glyph)) / units_per_em)
            })
            .unwrap_or_else(|| estimated_advance_em(c))
    }
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FontSource({})", self.describe())
    }
}

/// Resolve the font the layout engine should use.
///
/// Candidates are tried in order; the first file that exists and parses
/// wins. With `builtin_fallback`, Helvetica is used when nothing matches;
/// otherwise the call fails with `FontUnavailable`.
#[instrument(skip(candidates), fields(candidates = candidates.len()))]
pub fn resolve_font(candidates: &[PathBuf], builtin_fallback: bool) -> Result<FontSource> {
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        match FontSource::from_file(path) {
            Ok(font) => {
                info!(font = %path.display(), "Using font");
                return Ok(font);
            }
            Err(err) => warn!(font = %path.display(), %err, "Skipping unusable font"),
        }
    }

    if builtin_fallback {
        warn!("No font file found, falling back to builtin Helvetica (Latin-1 only)");
        return Ok(FontSource::builtin());
    }

    let tried = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(SealdocError::FontUnavailable(format!(
        "none of the configured fonts could be loaded (tried: {tried})"
    )))
}

fn estimated_advance_em(c: char) -> f64 {
    if is_wide(c) {
        WIDE_GLYPH_EM
    } else {
        NARROW_GLYPH_EM
    }
}

/// East Asian wide and full-width ranges.
fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}
