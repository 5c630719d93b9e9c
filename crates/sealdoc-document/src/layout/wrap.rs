// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy single-column paragraph wrap.
//
// Break opportunities come from the Unicode line breaking algorithm (UAX #14),
// so Latin text breaks between words and CJK text between ideographs. No
// hyphenation, no widow/orphan control.

use unicode_linebreak::{BreakOpportunity, linebreaks};

use crate::fonts::FontSource;

/// Wrap one paragraph (no `\n`) into lines.
///
/// The first line may be `first_width_mm` wide, every later line
/// `width_mm`. A segment wider than a whole line is broken between
/// characters.
pub fn wrap_paragraph(
    text: &str,
    first_width_mm: f64,
    width_mm: f64,
    font: &FontSource,
    size_pt: f64,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    let limit = |lines: &[String]| {
        if lines.is_empty() {
            first_width_mm
        } else {
            width_mm
        }
    };

    for (end, opportunity) in linebreaks(text) {
        let segment = &text[start..end];
        start = end;

        let candidate = format!("{current}{segment}");
        if font.text_width_mm(candidate.trim_end(), size_pt) <= limit(&lines) {
            current = candidate;
        } else {
            let finished = current.trim_end();
            if !finished.is_empty() {
                lines.push(finished.to_string());
            }
            current.clear();
            // Segment alone may still overflow: break it by characters.
            for c in segment.chars() {
                let mut next = current.clone();
                next.push(c);
                if !current.is_empty()
                    && font.text_width_mm(next.trim_end(), size_pt) > limit(&lines)
                {
                    lines.push(current.trim_end().to_string());
                    current = c.to_string();
                } else {
                    current = next;
                }
            }
        }

        if opportunity == BreakOpportunity::Mandatory && end < text.len() {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
    }

    if !current.trim_end().is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}
