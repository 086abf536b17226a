use colored::Colorize;
use planten::commands::basket::BasketView;
use planten::commands::list::{Listing, SelectAllState};
use planten::commands::{CmdMessage, MessageLevel};
use planten::model::{format_euro, Plant};
use planten::settings::{ExportSettings, SETTING_KEYS};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 34;
const KIND_WIDTH: usize = 16;
const PRICE_WIDTH: usize = 9;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn render_listing(listing: &Listing) -> String {
    if listing.plants.is_empty() {
        return if listing.catalog_size == 0 {
            "No plants yet.\n".to_string()
        } else {
            "No plants match the filter.\n".to_string()
        };
    }

    let marker = match listing.select_all {
        SelectAllState::Checked => "[x]",
        SelectAllState::Indeterminate => "[-]",
        SelectAllState::Unchecked => "[ ]",
    };
    let mut out = format!(
        "{} {}\n",
        marker,
        format!(
            "{} of {} plant(s) shown",
            listing.plants.len(),
            listing.catalog_size
        )
        .dimmed()
    );

    let id_width = listing
        .plants
        .iter()
        .map(|p| p.plant.id.width())
        .max()
        .unwrap_or(0);

    for listed in &listing.plants {
        let plant = &listed.plant;
        let check = if listed.selected { "[x]" } else { "[ ]" };
        let name = pad_to_width(&display_name(plant), NAME_WIDTH);
        let kind = pad_to_width(&plant.kind, KIND_WIDTH);
        let price = format!("{:>width$}", format_euro(plant.price), width = PRICE_WIDTH);
        let qty = listed
            .quantity
            .map(|q| format!("  ×{}", q))
            .unwrap_or_default();

        let line = format!(
            "{} {:<id_width$}  {}  {}{}{}",
            check,
            plant.id,
            name,
            kind,
            price,
            qty,
            id_width = id_width
        );
        if listed.selected {
            out.push_str(&format!("{}\n", line.green()));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

pub(super) fn render_plant(plant: &Plant) -> String {
    let mut out = format!("{} {}\n", plant.id.yellow(), plant.name.bold());
    if let Some(botanical) = &plant.botanical_name {
        out.push_str(&format!("{}\n", botanical.italic()));
    }
    out.push_str("--------------------------------\n");
    out.push_str(&format!("Kind:  {}\n", plant.kind));
    out.push_str(&format!("Price: {}\n", format_euro(plant.price)));
    out.push_str(&format!(
        "Photo: {}\n",
        if plant.image.is_some() { "yes" } else { "no" }
    ));
    if let Some(description) = &plant.description {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }
    out
}

pub(super) fn render_basket(basket: &BasketView) -> String {
    let mut out = String::new();
    for line in &basket.lines {
        out.push_str(&format!(
            "{:>4} × {}  {} {}  {}\n",
            line.quantity,
            pad_to_width(&line.plant.name, NAME_WIDTH),
            "@".dimmed(),
            format!("{:>width$}", format_euro(line.plant.price), width = PRICE_WIDTH),
            format!("{:>width$}", format_euro(line.line_total), width = PRICE_WIDTH).bold()
        ));
    }
    if !basket.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format!("Total: {}", format_euro(basket.total)).bold()
        ));
    }
    out
}

pub(super) fn render_settings(settings: &ExportSettings) -> String {
    let mut lines: Vec<String> = SETTING_KEYS
        .iter()
        .filter(|key| !key.contains('<'))
        .filter_map(|key| settings.get(key).map(|value| format!("{} = {}", key, value)))
        .collect();

    for (column, name) in &settings.col_names {
        lines.push(format!("col-name.{} = {}", column, name));
    }
    for (column, width) in &settings.col_widths {
        lines.push(format!("col-width.{} = {}", column, width));
    }
    for (column, align) in &settings.align {
        lines.push(format!("align.{} = {}", column, align));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn display_name(plant: &Plant) -> String {
    match &plant.botanical_name {
        Some(botanical) => format!("{} ({})", plant.name, botanical),
        None => plant.name.clone(),
    }
}

/// Truncates with an ellipsis, then pads with spaces to exactly `width` columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
