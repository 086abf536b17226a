//! [`DrawingSurface`] backed by `lopdf`.
//!
//! Drawing calls are recorded as content-stream operations per page and turned
//! into a document on [`PdfSurface::write_to`]. Fonts are the base-14 Type1
//! fonts with WinAnsi encoding; images are embedded as Flate-compressed RGB.

use super::metrics::{self, BaseFamily};
use super::surface::{Align, DrawingSurface, Font, FontStyle, Rgb};
use crate::error::Result;
use crate::imaging::RasterImage;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

struct EmbeddedImage {
    name: String,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

pub struct PdfSurface {
    width: f64,
    height: f64,
    pages: Vec<Vec<Operation>>,
    current: usize,
    font: Font,
    text_color: Rgb,
    draw_color: Rgb,
    line_width: f64,
    /// Base font name -> resource name.
    fonts: BTreeMap<&'static str, String>,
    images: Vec<EmbeddedImage>,
    image_index: HashMap<u64, usize>,
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::a4()
    }
}

impl PdfSurface {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width: width_mm,
            height: height_mm,
            pages: vec![Vec::new()],
            current: 0,
            font: Font::new("Helvetica", FontStyle::Normal, 12.0),
            text_color: Rgb::BLACK,
            draw_color: Rgb::BLACK,
            line_width: 0.2,
            fonts: BTreeMap::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
        }
    }

    pub fn a4() -> Self {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    fn push(&mut self, op: Operation) {
        self.pages[self.current].push(op);
    }

    fn font_resource(&mut self) -> String {
        let base = BaseFamily::resolve(&self.font.family).postscript_name(self.font.style);
        let next = format!("F{}", self.fonts.len() + 1);
        self.fonts.entry(base).or_insert(next).clone()
    }

    fn image_resource(&mut self, image: &RasterImage) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        (image.width, image.height, &image.rgb).hash(&mut hasher);
        let key = hasher.finish();
        if let Some(&index) = self.image_index.get(&key) {
            return Ok(self.images[index].name.clone());
        }

        let name = format!("Im{}", self.images.len() + 1);
        self.images.push(EmbeddedImage {
            name: name.clone(),
            width: image.width,
            height: image.height,
            data: deflate(&image.rgb)?,
        });
        self.image_index.insert(key, self.images.len() - 1);
        Ok(name)
    }

    fn x(&self, mm: f64) -> f64 {
        mm * POINTS_PER_MM
    }

    fn y(&self, mm: f64) -> f64 {
        (self.height - mm) * POINTS_PER_MM
    }

    /// Assembles the recorded pages into a document.
    pub fn to_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for (base, name) in &self.fonts {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => Object::Name(base.as_bytes().to_vec()),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(name.as_bytes().to_vec(), font_id);
        }

        let mut xobjects = Dictionary::new();
        for image in &self.images {
            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width as i64,
                    "Height" => image.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                image.data.clone(),
            );
            let image_id = doc.add_object(stream);
            xobjects.set(image.name.as_bytes().to_vec(), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            Object::Real((self.width * POINTS_PER_MM) as f32),
            Object::Real((self.height * POINTS_PER_MM) as f32),
        ];

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in &self.pages {
            let content = Content {
                operations: operations.clone(),
            };
            let stream = Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                deflate(&content.encode()?)?,
            );
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => media_box.clone(),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        Ok(doc)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut doc = self.to_document()?;
        doc.save_to(writer)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), pages = self.pages.len(), "pdf written");
        Ok(())
    }
}

impl DrawingSurface for PdfSurface {
    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn text_width(&self, text: &str) -> f64 {
        metrics::text_width(&self.font, text)
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Right => x - self.text_width(text),
        };
        let resource = self.font_resource();
        let (px, py) = (self.x(x), self.y(y));
        let size = self.font.size;
        let color = self.text_color;

        self.push(Operation::new("BT", vec![]));
        self.push(Operation::new("rg", color_operands(color)));
        self.push(Operation::new(
            "Tf",
            vec![Object::Name(resource.into_bytes()), real(size)],
        ));
        self.push(Operation::new("Td", vec![real(px), real(py)]));
        self.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        self.push(Operation::new("ET", vec![]));
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let color = self.draw_color;
        let width = self.line_width * POINTS_PER_MM;
        let (ax, ay, bx, by) = (self.x(x1), self.y(y1), self.x(x2), self.y(y2));

        self.push(Operation::new("RG", color_operands(color)));
        self.push(Operation::new("w", vec![real(width)]));
        self.push(Operation::new("m", vec![real(ax), real(ay)]));
        self.push(Operation::new("l", vec![real(bx), real(by)]));
        self.push(Operation::new("S", vec![]));
    }

    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64, w: f64, h: f64) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let name = match self.image_resource(image) {
            Ok(name) => name,
            Err(err) => {
                warn!(error = %err, "could not embed image");
                return;
            }
        };
        let (pw, ph) = (w * POINTS_PER_MM, h * POINTS_PER_MM);
        let (px, py) = (self.x(x), self.y(y + h));

        self.push(Operation::new("q", vec![]));
        self.push(Operation::new(
            "cm",
            vec![real(pw), real(0.0), real(0.0), real(ph), real(px), real(py)],
        ));
        self.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.push(Operation::new("Q", vec![]));
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn set_page(&mut self, page: usize) {
        self.current = page.clamp(1, self.pages.len()) - 1;
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    let Rgb(r, g, b) = color;
    vec![
        real(r as f64 / 255.0),
        real(g as f64 / 255.0),
        real(b as f64 / 255.0),
    ]
}

/// Encodes text for the WinAnsi-encoded base fonts. Unmappable characters
/// become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
