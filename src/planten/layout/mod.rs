//! # PDF Layout Engine
//!
//! Lays out a list of [`ExportItem`]s as a paginated catalog on any
//! [`DrawingSurface`]. Units are millimetres on the page, font sizes points.
//!
//! ## Page structure
//!
//! Every page starts with a header (title, export date, rule). Plant blocks
//! follow, each reserving at least [`BLOCK_MIN_HEIGHT`]; a block that would not
//! fit above the bottom margin moves to a fresh page. After the last block the
//! aggregate total is drawn when the price column is enabled.
//!
//! Footers need the final page count, so they are drawn in a separate pass once
//! all content is placed: the engine revisits each page with
//! [`DrawingSurface::set_page`].
//!
//! ## Images
//!
//! Images are decoded one at a time in list order. A photo that fails to decode
//! is logged and the block is laid out as if the plant had none; the export
//! never aborts because of a single image. The footer logo is loaded once.

pub mod metrics;
pub mod pdf;
pub mod surface;

use crate::error::{PlantenError, Result};
use crate::imaging::{ImageLoader, RasterImage};
use crate::model::{format_euro, Column, ExportItem, ExportMode, Plant};
use crate::settings::ExportSettings;
use surface::{Align, DrawingSurface, Font, FontStyle, Rgb};
use tracing::{debug, warn};

pub const MARGIN_LEFT: f64 = 15.0;
pub const MARGIN_RIGHT: f64 = 15.0;
pub const MARGIN_TOP: f64 = 20.0;
pub const MARGIN_BOTTOM: f64 = 30.0;
pub const LINE_HEIGHT: f64 = 7.0;
pub const BLOCK_MIN_HEIGHT: f64 = 100.0;
pub const IMAGE_SIZE: f64 = 40.0;
pub const TEXT_X: f64 = MARGIN_LEFT + IMAGE_SIZE + 10.0;
pub const FOOTER_MARGIN: f64 = 10.0;
pub const LOGO_SIZE: f64 = 20.0;

/// Room the aggregate total needs before it forces a page break.
const TOTAL_HEIGHT: f64 = 20.0;

const HIGHLIGHT: Rgb = Rgb(0x38, 0x8e, 0x3c);
const DEFAULT_BORDER: Rgb = Rgb(0x88, 0x88, 0x88);

/// What a render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub pages: usize,
    /// The aggregate total, when it was drawn.
    pub total: Option<f64>,
    /// Plant photos that could not be decoded and were left out.
    pub failed_images: usize,
}

/// Lays out `items` on `surface`. The surface must be fresh (one empty page).
pub fn render<S, L>(
    items: &[ExportItem],
    settings: &ExportSettings,
    mode: ExportMode,
    surface: &mut S,
    loader: &L,
) -> Result<LayoutReport>
where
    S: DrawingSurface + ?Sized,
    L: ImageLoader + ?Sized,
{
    if items.is_empty() {
        return Err(PlantenError::validation("No plants selected to export"));
    }

    let mut layout = Layout::new(settings, mode, surface, loader);
    layout.draw_header();
    for (index, item) in items.iter().enumerate() {
        layout.draw_block(item, index + 1 == items.len());
    }
    let total = layout.draw_total(items);
    layout.finalize();

    let report = LayoutReport {
        pages: layout.surface.page_count(),
        total,
        failed_images: layout.failed_images,
    };
    debug!(
        items = items.len(),
        pages = report.pages,
        failed_images = report.failed_images,
        "layout complete"
    );
    Ok(report)
}

struct Layout<'a, S: ?Sized, L: ?Sized> {
    settings: &'a ExportSettings,
    mode: ExportMode,
    surface: &'a mut S,
    loader: &'a L,
    page_width: f64,
    page_height: f64,
    title_color: Rgb,
    border_color: Rgb,
    y: f64,
    failed_images: usize,
}

impl<'a, S, L> Layout<'a, S, L>
where
    S: DrawingSurface + ?Sized,
    L: ImageLoader + ?Sized,
{
    fn new(
        settings: &'a ExportSettings,
        mode: ExportMode,
        surface: &'a mut S,
        loader: &'a L,
    ) -> Self {
        let (page_width, page_height) = surface.page_size();
        Self {
            settings,
            mode,
            surface,
            loader,
            page_width,
            page_height,
            title_color: Rgb::from_hex_or(&settings.title_color, HIGHLIGHT),
            border_color: Rgb::from_hex_or(&settings.border_color, DEFAULT_BORDER),
            y: MARGIN_TOP,
            failed_images: 0,
        }
    }

    fn font(&self, style: FontStyle, size: f64) -> Font {
        Font::new(&self.settings.font_family, style, size)
    }

    fn use_font(&mut self, style: FontStyle, size: f64, color: Rgb) {
        let font = self.font(style, size);
        self.surface.set_font(&font);
        self.surface.set_text_color(color);
    }

    fn content_right(&self) -> f64 {
        self.page_width - MARGIN_RIGHT
    }

    fn content_width(&self) -> f64 {
        self.page_width - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn draw_header(&mut self) {
        let size = self.settings.font_size;
        self.y = MARGIN_TOP;

        let title = match self.mode {
            ExportMode::Flat => self.settings.title.clone(),
            ExportMode::Basket => format!("Mandje: {}", self.settings.title),
        };
        self.use_font(FontStyle::Bold, size + 8.0, self.title_color);
        self.surface.draw_text(&title, MARGIN_LEFT, self.y, Align::Left);

        self.use_font(FontStyle::Normal, size, Rgb::gray(50));
        let date = format!("Datum: {}", self.settings.export_date);
        let right = self.content_right();
        self.surface.draw_text(&date, right, self.y, Align::Right);
        self.y += 15.0;

        self.surface.set_draw_color(self.title_color);
        self.surface.set_line_width(0.5);
        self.surface.draw_line(MARGIN_LEFT, self.y, right, self.y);
        self.y += 10.0;
    }

    /// Starts a new page (with header) unless `height` still fits on this one.
    fn ensure_room(&mut self, height: f64) {
        if self.y + height > self.page_height - MARGIN_BOTTOM {
            self.surface.new_page();
            debug!(page = self.surface.page_count(), "page break");
            self.draw_header();
        }
    }

    fn draw_block(&mut self, item: &ExportItem, last: bool) {
        self.ensure_room(BLOCK_MIN_HEIGHT);

        let plant = &item.plant;
        let size = self.settings.font_size;
        let top = self.y;
        let image_drawn = self.draw_photo(plant, top);

        let mut text_y = top + size / 2.0;

        self.use_font(FontStyle::Bold, size + 4.0, self.title_color);
        self.surface.draw_text(&plant.name, TEXT_X, text_y, Align::Left);
        text_y += size + 5.0;

        if let Some(botanical) = plant.botanical_name.as_deref() {
            if self.settings.has_column(Column::BotanicalName) {
                self.use_font(FontStyle::Italic, size, Rgb::gray(80));
                self.surface
                    .draw_text(&format!("({})", botanical), TEXT_X, text_y, Align::Left);
                text_y += size + 5.0;
            }
        }

        let details = self.detail_line(item);
        if !details.is_empty() {
            self.use_font(FontStyle::Normal, size, Rgb::gray(50));
            self.surface.draw_text(&details, TEXT_X, text_y, Align::Left);
            text_y += LINE_HEIGHT + 2.0;
        }

        if self.mode == ExportMode::Basket {
            self.use_font(FontStyle::Bold, size, HIGHLIGHT);
            let line = format!("Totaal: {}", format_euro(item.line_total()));
            self.surface.draw_text(&line, TEXT_X, text_y, Align::Left);
            text_y += LINE_HEIGHT + 5.0;
        }

        if let Some(description) = plant.description.as_deref() {
            if self.settings.has_column(Column::Description) {
                text_y = self.draw_description(description, top, text_y, image_drawn);
            }
        }

        self.y = (top + BLOCK_MIN_HEIGHT).max(text_y + 5.0);

        if last {
            self.y += 10.0;
        } else {
            self.surface.set_draw_color(self.border_color);
            self.surface.set_line_width(0.2);
            let right = self.content_right();
            self.surface.draw_line(MARGIN_LEFT, self.y, right, self.y);
            self.y += 5.0;
        }
    }

    fn draw_photo(&mut self, plant: &Plant, top: f64) -> bool {
        if !self.settings.has_column(Column::Image) {
            return false;
        }
        let Some(source) = plant.image.as_deref() else {
            return false;
        };
        match self.loader.load(source) {
            Ok(image) => {
                self.surface
                    .draw_image(&image, MARGIN_LEFT, top, IMAGE_SIZE, IMAGE_SIZE);
                true
            }
            Err(err) => {
                warn!(
                    plant = %plant.id,
                    error = %err,
                    "plant image could not be loaded; leaving it out"
                );
                self.failed_images += 1;
                false
            }
        }
    }

    fn detail_line(&self, item: &ExportItem) -> String {
        let plant = &item.plant;
        let mut parts = Vec::new();
        if self.mode == ExportMode::Basket {
            parts.push(format!("Aantal: {}", item.quantity));
        }
        if !plant.kind.is_empty() && self.settings.has_column(Column::Kind) {
            parts.push(format!(
                "{}: {}",
                self.settings.column_label(Column::Kind),
                plant.kind
            ));
        }
        if plant.price > 0.0 && self.settings.has_column(Column::Price) {
            let label = self.settings.column_label(Column::Price);
            let label = match self.mode {
                ExportMode::Flat => label,
                ExportMode::Basket => format!("{} per stuk", label),
            };
            parts.push(format!("{}: {}", label, format_euro(plant.price)));
        }
        parts.join(" | ")
    }

    /// Draws the description and returns the text cursor below it.
    ///
    /// Beside a drawn photo, lines go in the text column while they stay within
    /// the photo's band; whatever is left continues at full width below it.
    fn draw_description(
        &mut self,
        description: &str,
        top: f64,
        text_y: f64,
        image_drawn: bool,
    ) -> f64 {
        let size = self.settings.font_size;
        self.use_font(FontStyle::Normal, size - 1.0, Rgb::gray(30));
        let width = self.content_width();

        if !image_drawn {
            let lines = self.surface.wrap(description, width);
            let mut y = text_y;
            for line in &lines {
                self.surface.draw_text(&line.text, MARGIN_LEFT, y, Align::Left);
                y += LINE_HEIGHT;
            }
            return y;
        }

        let band_bottom = top + IMAGE_SIZE + 5.0;
        let beside = self.surface.wrap(description, width - IMAGE_SIZE - 15.0);
        let mut desc_y = text_y;
        let mut consumed = 0;
        for line in &beside {
            if desc_y + LINE_HEIGHT > band_bottom {
                break;
            }
            self.surface.draw_text(&line.text, TEXT_X, desc_y, Align::Left);
            desc_y += LINE_HEIGHT;
            consumed = line.end;
        }

        let remainder = description[consumed..].trim();
        if remainder.is_empty() {
            return text_y.max(desc_y);
        }

        let start = top + IMAGE_SIZE + 10.0;
        let lines = self.surface.wrap(remainder, width);
        for (i, line) in lines.iter().enumerate() {
            let y = start + i as f64 * LINE_HEIGHT;
            self.surface.draw_text(&line.text, MARGIN_LEFT, y, Align::Left);
        }
        text_y.max(start + lines.len() as f64 * LINE_HEIGHT)
    }

    fn draw_total(&mut self, items: &[ExportItem]) -> Option<f64> {
        if !self.settings.has_column(Column::Price) {
            return None;
        }
        let total: f64 = items.iter().map(ExportItem::line_total).sum();
        self.ensure_room(TOTAL_HEIGHT);

        let size = self.settings.font_size;
        let (label, bump) = match self.mode {
            ExportMode::Flat => ("Totaal geselecteerde planten", 2.0),
            ExportMode::Basket => ("Totaalprijs Mandje", 4.0),
        };
        self.use_font(FontStyle::Bold, size + bump, HIGHLIGHT);
        let text = format!("{}: {}", label, format_euro(total));
        self.surface
            .draw_text(&text, MARGIN_LEFT, self.y + LINE_HEIGHT, Align::Left);
        self.y += 15.0;
        Some(total)
    }

    fn finalize(&mut self) {
        let logo = self.load_logo();
        let pages = self.surface.page_count();
        for page in 1..=pages {
            self.surface.set_page(page);
            self.draw_footer(page, pages, logo.as_ref());
        }
    }

    fn load_logo(&self) -> Option<RasterImage> {
        let source = self.settings.logo_url.trim();
        if source.is_empty() {
            return None;
        }
        match self.loader.load(source) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(
                    logo = %source,
                    error = %err,
                    "footer logo could not be loaded; leaving it out"
                );
                None
            }
        }
    }

    fn draw_footer(&mut self, page: usize, pages: usize, logo: Option<&RasterImage>) {
        let size = self.settings.font_size * 0.8;
        self.use_font(FontStyle::Normal, size, Rgb::gray(100));

        let info_y = self.page_height - FOOTER_MARGIN - size;
        let advance = metrics::line_advance(size);
        let lines = self
            .surface
            .wrap(&self.settings.company_info, self.page_width / 2.0 - FOOTER_MARGIN);
        for (i, line) in lines.iter().enumerate() {
            let y = info_y + i as f64 * advance;
            self.surface.draw_text(&line.text, FOOTER_MARGIN, y, Align::Left);
        }

        if let Some(logo) = logo {
            let y = self.page_height - FOOTER_MARGIN - LOGO_SIZE;
            self.surface
                .draw_image(logo, FOOTER_MARGIN, y, LOGO_SIZE, LOGO_SIZE);
        }

        let label = format!("Pagina {} van {}", page, pages);
        self.surface.draw_text(
            &label,
            self.page_width - FOOTER_MARGIN,
            self.page_height - FOOTER_MARGIN,
            Align::Right,
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::metrics;
    use super::surface::{Align, DrawingSurface, Font, FontStyle, Rgb};
    use crate::error::{PlantenError, Result};
    use crate::imaging::{ImageLoader, RasterImage};
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Text {
            page: usize,
            text: String,
            x: f64,
            y: f64,
            align: Align,
            font: Font,
            color: Rgb,
        },
        Line {
            page: usize,
            y: f64,
            width: f64,
            color: Rgb,
        },
        Image {
            page: usize,
            x: f64,
            y: f64,
            w: f64,
            h: f64,
        },
    }

    /// Records every draw call against an A4 page.
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
        pages: usize,
        current: usize,
        font: Font,
        text_color: Rgb,
        draw_color: Rgb,
        line_width: f64,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self {
                ops: Vec::new(),
                pages: 1,
                current: 1,
                font: Font::new("Helvetica", FontStyle::Normal, 12.0),
                text_color: Rgb::BLACK,
                draw_color: Rgb::BLACK,
                line_width: 0.2,
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn text_op(&self, needle: &str) -> Option<&Op> {
            self.ops
                .iter()
                .find(|op| matches!(op, Op::Text { text, .. } if text == needle))
        }

        pub fn images(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Image { .. }))
                .collect()
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn page_size(&self) -> (f64, f64) {
            (210.0, 297.0)
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
            self.ops.push(Op::Text {
                page: self.current,
                text: text.to_string(),
                x,
                y,
                align,
                font: self.font.clone(),
                color: self.text_color,
            });
        }

        fn draw_line(&mut self, _x1: f64, y1: f64, _x2: f64, _y2: f64) {
            self.ops.push(Op::Line {
                page: self.current,
                y: y1,
                width: self.line_width,
                color: self.draw_color,
            });
        }

        fn draw_image(&mut self, _image: &RasterImage, x: f64, y: f64, w: f64, h: f64) {
            self.ops.push(Op::Image {
                page: self.current,
                x,
                y,
                w,
                h,
            });
        }

        fn new_page(&mut self) {
            self.pages += 1;
            self.current = self.pages;
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn set_page(&mut self, page: usize) {
            self.current = page.clamp(1, self.pages);
        }
    }

    /// Serves a 1x1 pixel for sources starting with `ok`, fails otherwise.
    #[derive(Default)]
    pub struct StubLoader {
        pub calls: Cell<usize>,
    }

    impl ImageLoader for StubLoader {
        fn load(&self, source: &str) -> Result<RasterImage> {
            self.calls.set(self.calls.get() + 1);
            if source.starts_with("ok") {
                Ok(RasterImage {
                    width: 1,
                    height: 1,
                    rgb: vec![0, 128, 0],
                })
            } else {
                Err(PlantenError::validation(format!("cannot decode {}", source)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Op, RecordingSurface, StubLoader};
    use super::*;
    use crate::model::PlantFields;

    fn settings() -> ExportSettings {
        ExportSettings::defaults("2024-03-01")
    }

    fn item(id: &str, name: &str, price: f64, quantity: u32) -> ExportItem {
        ExportItem {
            plant: Plant::new(id.into(), PlantFields::new(name, "Vaste plant", price), None),
            quantity,
        }
    }

    fn with_image(mut item: ExportItem, source: &str) -> ExportItem {
        item.plant.image = Some(source.to_string());
        item
    }

    fn render_items(
        items: &[ExportItem],
        settings: &ExportSettings,
        mode: ExportMode,
    ) -> (RecordingSurface, LayoutReport) {
        let mut surface = RecordingSurface::new();
        let report = render(items, settings, mode, &mut surface, &StubLoader::default()).unwrap();
        (surface, report)
    }

    #[test]
    fn empty_export_is_rejected_before_drawing() {
        let mut surface = RecordingSurface::new();
        let err = render(&[], &settings(), ExportMode::Flat, &mut surface, &StubLoader::default())
            .unwrap_err();
        assert!(matches!(err, PlantenError::Validation(_)));
        assert!(surface.ops.is_empty());
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn header_on_first_page() {
        let (surface, report) =
            render_items(&[item("a", "Aster", 2.5, 1)], &settings(), ExportMode::Flat);
        assert_eq!(report.pages, 1);

        let texts = surface.texts();
        assert_eq!(texts[0], "Mijn Plantenlijst");
        assert_eq!(texts[1], "Datum: 2024-03-01");
        match surface.text_op("Datum: 2024-03-01") {
            Some(Op::Text { x, align, .. }) => {
                assert_eq!(*x, 195.0);
                assert_eq!(*align, Align::Right);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(surface.ops[2], Op::Line { y, width, .. } if y == 35.0 && width == 0.5));
    }

    #[test]
    fn third_block_breaks_to_a_new_page_with_header() {
        let items: Vec<_> = (1..=3)
            .map(|i| item(&format!("p{}", i), &format!("Plant {}", i), 2.5, 1))
            .collect();
        let (surface, report) = render_items(&items, &settings(), ExportMode::Flat);

        assert_eq!(report.pages, 2);
        let titles: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { page, text, .. } if text == "Mijn Plantenlijst" => Some(*page),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec![1, 2]);

        match surface.text_op("Plant 3") {
            Some(Op::Text { page, y, .. }) => {
                assert_eq!(*page, 2);
                assert_eq!(*y, 45.0 + 6.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn footers_carry_the_final_page_count() {
        let items: Vec<_> = (1..=3)
            .map(|i| item(&format!("p{}", i), &format!("Plant {}", i), 2.5, 1))
            .collect();
        let (surface, _) = render_items(&items, &settings(), ExportMode::Flat);

        for (page, label) in [(1, "Pagina 1 van 2"), (2, "Pagina 2 van 2")] {
            match surface.text_op(label) {
                Some(Op::Text { page: p, x, y, align, .. }) => {
                    assert_eq!(*p, page);
                    assert_eq!((*x, *y), (200.0, 287.0));
                    assert_eq!(*align, Align::Right);
                }
                other => panic!("missing {}: {:?}", label, other),
            }
        }
        assert!(surface.texts().iter().all(|t| !t.contains("van 3")));
    }

    #[test]
    fn separators_between_blocks_only() {
        let items = vec![item("a", "Aster", 1.0, 1), item("b", "Buxus", 1.0, 1)];
        let (surface, _) = render_items(&items, &settings(), ExportMode::Flat);

        let thin: Vec<_> = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Line { width, .. } if *width == 0.2))
            .collect();
        assert_eq!(thin.len(), 1);
        assert!(matches!(
            thin[0],
            Op::Line { y, color, .. } if *y == 145.0 && *color == Rgb(0x88, 0x88, 0x88)
        ));
    }

    #[test]
    fn flat_total_sums_prices() {
        let items: Vec<_> = (1..=3)
            .map(|i| item(&format!("p{}", i), &format!("Plant {}", i), 2.5, 1))
            .collect();
        let (surface, report) = render_items(&items, &settings(), ExportMode::Flat);

        assert_eq!(report.total, Some(7.5));
        assert!(surface.text_op("Totaal geselecteerde planten: €7.50").is_some());
        assert!(surface.text_op("Soort: Vaste plant | Prijs: €2.50").is_some());
    }

    #[test]
    fn basket_shows_quantities_and_totals() {
        let items = vec![item("a", "Rose", 10.0, 2), item("b", "Tulp", 5.0, 2)];
        let (surface, report) = render_items(&items, &settings(), ExportMode::Basket);

        assert_eq!(report.total, Some(30.0));
        let texts = surface.texts();
        assert_eq!(texts[0], "Mandje: Mijn Plantenlijst");
        assert!(texts.contains(&"Aantal: 2 | Soort: Vaste plant | Prijs per stuk: €10.00"));
        assert!(texts.contains(&"Totaal: €20.00"));
        assert!(texts.contains(&"Totaal: €10.00"));

        match surface.text_op("Totaalprijs Mandje: €30.00") {
            Some(Op::Text { font, color, .. }) => {
                assert_eq!(font.style, FontStyle::Bold);
                assert_eq!(font.size, 16.0);
                assert_eq!(*color, HIGHLIGHT);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn total_needs_the_price_column() {
        let mut settings = settings();
        settings.columns.retain(|c| *c != Column::Price);
        let (surface, report) =
            render_items(&[item("a", "Aster", 4.0, 1)], &settings, ExportMode::Basket);

        assert_eq!(report.total, None);
        assert!(surface.texts().iter().all(|t| !t.starts_with("Totaalprijs")));
        assert!(surface.text_op("Aantal: 1 | Soort: Vaste plant").is_some());
    }

    #[test]
    fn failing_image_does_not_abort() {
        let items = vec![
            with_image(item("a", "Aster", 1.0, 1), "broken"),
            with_image(item("b", "Buxus", 1.0, 1), "ok-photo"),
        ];
        let (surface, report) = render_items(&items, &settings(), ExportMode::Flat);

        assert_eq!(report.failed_images, 1);
        let images = surface.images();
        assert_eq!(images.len(), 1);
        assert!(matches!(
            images[0],
            Op::Image { x, y, w, h, .. }
                if *x == 15.0 && *y == 150.0 && *w == 40.0 && *h == 40.0
        ));
        assert!(surface.text_op("Aster").is_some());
        assert!(surface.text_op("Totaal geselecteerde planten: €2.00").is_some());
    }

    #[test]
    fn image_column_off_skips_photos() {
        let mut settings = settings();
        settings.columns.retain(|c| *c != Column::Image);
        let loader = StubLoader::default();
        let mut surface = RecordingSurface::new();
        render(
            &[with_image(item("a", "Aster", 1.0, 1), "ok")],
            &settings,
            ExportMode::Flat,
            &mut surface,
            &loader,
        )
        .unwrap();
        assert!(surface.images().is_empty());
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn description_flows_beside_then_below_the_photo() {
        let mut entry = with_image(item("a", "Aster", 1.0, 1), "ok");
        entry.plant.description = Some("lange tekst ".repeat(40).trim().to_string());
        let (surface, _) = render_items(&[entry], &settings(), ExportMode::Flat);

        let description: Vec<(f64, f64)> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { x, y, font, .. } if font.size == 11.0 => Some((*x, *y)),
                _ => None,
            })
            .collect();

        // Name at 51, detail line at 68, so one line fits beside the photo.
        assert_eq!(description[0], (TEXT_X, 77.0));
        assert!(description.len() > 2);
        assert_eq!(description[1], (MARGIN_LEFT, 95.0));
        assert!(description[1..].iter().all(|(x, _)| *x == MARGIN_LEFT));
    }

    #[test]
    fn description_without_photo_uses_full_width() {
        let mut entry = item("a", "Aster", 1.0, 1);
        entry.plant.description = Some("Houdt van zon".into());
        let (surface, _) = render_items(&[entry], &settings(), ExportMode::Flat);

        match surface.text_op("Houdt van zon") {
            Some(Op::Text { x, y, font, .. }) => {
                assert_eq!((*x, *y), (MARGIN_LEFT, 77.0));
                assert_eq!(font.size, 11.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn logo_loads_once_and_lands_on_every_page() {
        let mut settings = settings();
        settings.logo_url = "ok-logo".into();
        let items: Vec<_> = (1..=3)
            .map(|i| item(&format!("p{}", i), &format!("Plant {}", i), 1.0, 1))
            .collect();
        let loader = StubLoader::default();
        let mut surface = RecordingSurface::new();
        render(&items, &settings, ExportMode::Flat, &mut surface, &loader).unwrap();

        assert_eq!(loader.calls.get(), 1);
        let pages: Vec<_> = surface
            .images()
            .iter()
            .filter_map(|op| match op {
                Op::Image { page, x, y, .. } if *x == 10.0 && *y == 267.0 => Some(*page),
                _ => None,
            })
            .collect();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn broken_logo_is_skipped() {
        let mut settings = settings();
        settings.logo_url = "https://example.org/logo.png".into();
        let (surface, report) =
            render_items(&[item("a", "Aster", 1.0, 1)], &settings, ExportMode::Flat);
        assert!(surface.images().is_empty());
        assert_eq!(report.failed_images, 0);
        assert!(surface.text_op("Pagina 1 van 1").is_some());
    }

    #[test]
    fn column_names_override_detail_labels() {
        let mut settings = settings();
        settings.col_names.insert("soort".into(), "Type".into());
        let (surface, _) = render_items(&[item("a", "Aster", 2.5, 1)], &settings, ExportMode::Flat);
        assert!(surface.text_op("Type: Vaste plant | Prijs: €2.50").is_some());
    }

    #[test]
    fn botanical_name_in_italics() {
        let mut entry = item("a", "Lavendel", 1.0, 1);
        entry.plant.botanical_name = Some("Lavandula".into());
        let (surface, _) = render_items(&[entry], &settings(), ExportMode::Flat);
        match surface.text_op("(Lavandula)") {
            Some(Op::Text { font, y, .. }) => {
                assert_eq!(font.style, FontStyle::Italic);
                assert_eq!(*y, 68.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
