//! The drawing backend the layout engine targets.
//!
//! Coordinates are millimetres from the top-left corner of the page; text `y`
//! is the baseline. Font sizes are points.

use crate::imaging::RasterImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    out[i] = channel(&c.to_string())? * 17;
                }
                Some(Rgb(out[0], out[1], out[2]))
            }
            6 => Some(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }

    /// Like [`Rgb::from_hex`], falling back when the value does not parse.
    pub fn from_hex_or(value: &str, fallback: Rgb) -> Self {
        Self::from_hex(value).unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub style: FontStyle,
    pub size: f64,
}

impl Font {
    pub fn new(family: &str, style: FontStyle, size: f64) -> Self {
        Self {
            family: family.to_string(),
            style,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One wrapped line. `end` is the byte offset in the source text just past the
/// last character the line consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub end: usize,
}

pub trait DrawingSurface {
    /// Page width and height.
    fn page_size(&self) -> (f64, f64);

    fn set_font(&mut self, font: &Font);
    fn set_text_color(&mut self, color: Rgb);
    fn set_draw_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f64);

    /// Width of `text` in the current font.
    fn text_width(&self, text: &str) -> f64;

    /// Greedy word wrap of `text` to `max_width` in the current font.
    fn wrap(&self, text: &str, max_width: f64) -> Vec<WrappedLine> {
        wrap_text(text, max_width, |s| self.text_width(s))
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, align: Align);
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64, w: f64, h: f64);

    /// Appends a page and makes it current.
    fn new_page(&mut self);
    fn page_count(&self) -> usize;
    /// Makes an existing page (1-based) current for further drawing.
    fn set_page(&mut self, page: usize);
}

/// Wraps `text` so no line measures wider than `max_width`.
///
/// Explicit newlines always break (an empty paragraph yields an empty line).
/// Words wider than a whole line are split between characters.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<WrappedLine>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut offset = 0;
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, offset, max_width, &measure, &mut lines);
        offset += paragraph.len() + 1;
    }
    lines
}

fn wrap_paragraph<F>(
    paragraph: &str,
    offset: usize,
    max_width: f64,
    measure: &F,
    lines: &mut Vec<WrappedLine>,
) where
    F: Fn(&str) -> f64,
{
    let push = |lines: &mut Vec<WrappedLine>, start: usize, end: usize| {
        lines.push(WrappedLine {
            text: paragraph[start..end].trim_end_matches('\r').to_string(),
            end: offset + end,
        });
    };

    let mut current: Option<(usize, usize)> = None;
    for (word_start, word_end) in word_spans(paragraph) {
        if let Some((start, _)) = current {
            if measure(&paragraph[start..word_end]) <= max_width {
                current = Some((start, word_end));
                continue;
            }
            if let Some((s, e)) = current.take() {
                push(lines, s, e);
            }
        }

        if measure(&paragraph[word_start..word_end]) <= max_width {
            current = Some((word_start, word_end));
            continue;
        }

        let mut piece_start = word_start;
        let mut fit_end = word_start;
        for (i, ch) in paragraph[word_start..word_end].char_indices() {
            let end = word_start + i + ch.len_utf8();
            if fit_end > piece_start && measure(&paragraph[piece_start..end]) > max_width {
                push(lines, piece_start, fit_end);
                piece_start = fit_end;
            }
            fit_end = end;
        }
        current = Some((piece_start, word_end));
    }

    match current {
        Some((start, end)) => push(lines, start, end),
        None => lines.push(WrappedLine {
            text: String::new(),
            end: offset + paragraph.len(),
        }),
    }
}

fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}
