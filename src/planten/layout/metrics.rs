//! Approximate glyph metrics for the built-in PDF fonts.
//!
//! Widths are in 1/1000 em from the Helvetica AFM. Times is measured with the
//! Helvetica table as well; Courier is monospaced.

use super::surface::{Font, FontStyle};

const MM_PER_POINT: f64 = 25.4 / 72.0;
const DEFAULT_WIDTH: u16 = 556;
const COURIER_WIDTH: u16 = 600;
const BOLD_FACTOR: f64 = 1.06;
const LINE_SPACING: f64 = 1.15;

// ASCII 32..=126
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// The built-in font family a requested family name renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseFamily {
    Helvetica,
    Times,
    Courier,
}

impl BaseFamily {
    pub fn resolve(family: &str) -> Self {
        let family = family.to_lowercase();
        if family.contains("courier") || family.contains("mono") {
            BaseFamily::Courier
        } else if family.contains("times")
            || (family.contains("serif") && !family.contains("sans"))
        {
            BaseFamily::Times
        } else {
            BaseFamily::Helvetica
        }
    }

    /// PostScript name of the base-14 font for this family and style.
    pub fn postscript_name(self, style: FontStyle) -> &'static str {
        match (self, style) {
            (BaseFamily::Helvetica, FontStyle::Normal) => "Helvetica",
            (BaseFamily::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
            (BaseFamily::Helvetica, FontStyle::Italic) => "Helvetica-Oblique",
            (BaseFamily::Times, FontStyle::Normal) => "Times-Roman",
            (BaseFamily::Times, FontStyle::Bold) => "Times-Bold",
            (BaseFamily::Times, FontStyle::Italic) => "Times-Italic",
            (BaseFamily::Courier, FontStyle::Normal) => "Courier",
            (BaseFamily::Courier, FontStyle::Bold) => "Courier-Bold",
            (BaseFamily::Courier, FontStyle::Italic) => "Courier-Oblique",
        }
    }
}

fn glyph_width(family: BaseFamily, ch: char) -> u16 {
    if family == BaseFamily::Courier {
        return COURIER_WIDTH;
    }
    match ch as u32 {
        code @ 32..=126 => HELVETICA[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in millimetres when set in `font`.
pub fn text_width(font: &Font, text: &str) -> f64 {
    let family = BaseFamily::resolve(&font.family);
    let units: u32 = text.chars().map(|c| glyph_width(family, c) as u32).sum();
    let mut width = units as f64 / 1000.0 * font.size * MM_PER_POINT;
    if font.style == FontStyle::Bold && family != BaseFamily::Courier {
        width *= BOLD_FACTOR;
    }
    width
}

/// Baseline-to-baseline distance for consecutive lines at `size` points.
pub fn line_advance(size: f64) -> f64 {
    size * LINE_SPACING * MM_PER_POINT
}
