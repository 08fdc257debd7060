//! The text measurement seam and utilities built on it.
//!
//! The engine never touches glyph data itself: every width it needs is asked
//! of a [`Measure`] collaborator, once per candidate line during wrapping and
//! once per line/word during column-width estimation. Layout is fully
//! deterministic as long as the collaborator is (same inputs, same answer).
//!
//! [`FontMeasurer`] is a ready-made implementation backed by a parsed TTF/OTF
//! face for callers that do not already have a metrics service.

use std::collections::HashMap;

use owned_ttf_parser::{AsFaceRef, OwnedFace};

use crate::error::TableError;
use crate::units::Mm;

const PT_TO_MM: f64 = 25.4 / 72.0;

/// The measurement collaborator: reports the rendered width of a single line
/// of text in the active font's metric space.
///
/// `font` is the cell style's font identifier; [None] selects the
/// implementation's fallback face. Implementations must be deterministic for
/// fixed inputs.
pub trait Measure {
    fn text_width(
        &self,
        font: Option<&str>,
        text: &str,
        font_size: f64,
        character_spacing: f64,
    ) -> Result<Mm, TableError>;
}

/// Wrap `text` into lines no wider than `width`.
///
/// Hard line breaks are preserved. Within a line, words are kept intact and
/// greedily packed; a single word wider than `width` falls back to
/// character-level breaking so that no line ever exceeds the box (each broken
/// piece keeps at least one character, so pathological widths still
/// terminate).
pub fn split_to_width(
    measure: &dyn Measure,
    font: Option<&str>,
    text: &str,
    font_size: f64,
    character_spacing: f64,
    width: Mm,
) -> Result<Vec<String>, TableError> {
    let fits = |s: &str| -> Result<bool, TableError> {
        Ok(measure.text_width(font, s, font_size, character_spacing)? <= width)
    };

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();

    for hard_line in normalized.split('\n') {
        let mut line = String::new();
        for word in hard_line.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if fits(&candidate)? {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if fits(word)? {
                line = word.to_string();
            } else {
                // word alone overflows the box: break it at character level
                for ch in word.chars() {
                    let mut candidate = line.clone();
                    candidate.push(ch);
                    if line.is_empty() || fits(&candidate)? {
                        line = candidate;
                    } else {
                        lines.push(std::mem::take(&mut line));
                        line.push(ch);
                    }
                }
            }
        }
        lines.push(line);
    }

    Ok(lines)
}

/// A [`Measure`] implementation backed by parsed TTF/OTF faces.
///
/// Widths are computed from the faces' horizontal glyph advances, scaled to
/// the requested size in points and reported in millimetres. Characters the
/// face has no glyph for fall back to the replacement glyph, then `?`, then
/// contribute no width at all.
pub struct FontMeasurer {
    fallback: OwnedFace,
    faces: HashMap<String, OwnedFace>,
}

impl FontMeasurer {
    /// Parse the fallback face from raw font bytes.
    pub fn new(font_data: Vec<u8>) -> Result<FontMeasurer, TableError> {
        Ok(FontMeasurer {
            fallback: OwnedFace::from_vec(font_data, 0)?,
            faces: HashMap::new(),
        })
    }

    /// Register an additional named face, selectable via a cell style's
    /// `font_name`.
    pub fn add_font(&mut self, name: impl Into<String>, font_data: Vec<u8>) -> Result<(), TableError> {
        self.faces
            .insert(name.into(), OwnedFace::from_vec(font_data, 0)?);
        Ok(())
    }

    fn face(&self, font: Option<&str>) -> &OwnedFace {
        font.and_then(|name| self.faces.get(name))
            .unwrap_or(&self.fallback)
    }
}

impl Measure for FontMeasurer {
    fn text_width(
        &self,
        font: Option<&str>,
        text: &str,
        font_size: f64,
        character_spacing: f64,
    ) -> Result<Mm, TableError> {
        let face = self.face(font).as_face_ref();
        let scaling = font_size / face.units_per_em() as f64;
        let mut width_pt = 0.0;
        let mut glyphs = 0usize;
        for ch in text.chars() {
            let gid = face
                .glyph_index(ch)
                .or_else(|| face.glyph_index('\u{FFFD}'))
                .or_else(|| face.glyph_index('?'));
            if let Some(gid) = gid {
                width_pt += face.glyph_hor_advance(gid).unwrap_or_default() as f64 * scaling;
            }
            glyphs += 1;
        }
        if glyphs > 1 {
            width_pt += character_spacing * (glyphs - 1) as f64;
        }
        Ok(Mm(width_pt * PT_TO_MM))
    }
}
