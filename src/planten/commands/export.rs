use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::imaging::ImageLoader;
use crate::layout::{self, pdf::PdfSurface};
use crate::model::{format_euro, ExportMode};
use crate::settings::ExportSettings;
use std::fs;
use std::path::Path;
use tracing::info;

/// Renders the selection to `<out_dir>/planten.pdf` (flat) or
/// `<out_dir>/planten_mandje.pdf` (basket).
pub fn run<L: ImageLoader + ?Sized>(
    catalog: &Catalog,
    settings: &ExportSettings,
    mode: ExportMode,
    out_dir: &Path,
    loader: &L,
) -> Result<CmdResult> {
    // Layout works on a copy; the catalog may change while images decode.
    let items = match mode {
        ExportMode::Flat => catalog.selected_items(),
        ExportMode::Basket => catalog.basket_items(),
    };

    let mut surface = PdfSurface::a4();
    let report = layout::render(&items, settings, mode, &mut surface, loader)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(mode.filename());
    surface.save(&path)?;
    info!(
        path = %path.display(),
        items = items.len(),
        pages = report.pages,
        "catalog exported"
    );

    let mut result = CmdResult::default();
    if report.failed_images > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} image(s) could not be loaded and were left out",
            report.failed_images
        )));
    }
    let total = report
        .total
        .map(|total| format!(", total {}", format_euro(total)))
        .unwrap_or_default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} plant(s) on {} page(s) to {}{}",
        items.len(),
        report.pages,
        path.display(),
        total
    )));
    Ok(result.with_export_path(path))
}
