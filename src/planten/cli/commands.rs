//! # CLI Layer
//!
//! One possible UI client for planten. This is the only place that reads
//! arguments, talks to the terminal or decides exit codes.
//!
//! - `run()`: parses arguments, installs logging and dispatches
//! - `handle_*()`: call one `PlantenApi` method and print its `CmdResult`
//! - rendering lives in `render.rs`

use super::render::{print_messages, render_basket, render_listing, render_plant, render_settings};
use super::setup::{CatalogCommands, Cli, Commands, ExportCommands, SelectionCommands};
use clap::Parser;
use planten::api::PlantenApi;
use planten::commands::settings::SettingsAction;
use planten::commands::CmdResult;
use planten::error::Result;
use planten::init::initialize;
use planten::model::{ExportMode, PlantFields, PlantUpdate};
use planten::store::fs::FileStore;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: PlantenApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = AppContext {
        api: initialize(cli.data_dir.as_deref())?.api,
    };

    match cli.command {
        Some(Commands::Catalog(cmd)) => match cmd {
            CatalogCommands::Add {
                name,
                kind,
                price,
                botanical,
                description,
                image,
            } => {
                let mut fields = PlantFields::new(name, kind, price);
                if let Some(botanical) = botanical {
                    fields = fields.with_botanical_name(botanical);
                }
                if let Some(description) = description {
                    fields = fields.with_description(description);
                }
                handle_add(&mut ctx, fields, image)
            }
            CatalogCommands::Edit {
                id,
                name,
                kind,
                price,
                botanical,
                description,
                image,
            } => {
                let update = PlantUpdate {
                    name,
                    botanical_name: botanical,
                    kind,
                    price,
                    description,
                };
                handle_edit(&mut ctx, &id, update, image)
            }
            CatalogCommands::Delete { id, yes } => handle_delete(&mut ctx, &id, yes),
            CatalogCommands::Show { id } => handle_show(&ctx, &id),
            CatalogCommands::List { filter } => handle_list(&ctx, filter),
        },
        Some(Commands::Selection(cmd)) => match cmd {
            SelectionCommands::Select { ids } => handle_toggle(&mut ctx, ids, true),
            SelectionCommands::Deselect { ids } => handle_toggle(&mut ctx, ids, false),
            SelectionCommands::SelectAll { filter } => handle_select_all(&mut ctx, filter),
            SelectionCommands::Clear => handle_clear(&mut ctx),
            SelectionCommands::Qty { id, quantity } => handle_quantity(&mut ctx, &id, quantity),
            SelectionCommands::Basket => handle_basket(&ctx),
            SelectionCommands::DeleteSelected { yes } => handle_delete_selected(&mut ctx, yes),
        },
        Some(Commands::Export(cmd)) => match cmd {
            ExportCommands::Export { basket, out } => handle_export(&ctx, basket, out),
            ExportCommands::Settings { key, value } => handle_settings(&mut ctx, key, value),
            ExportCommands::SettingsReset => handle_settings_reset(&mut ctx),
        },
        None => handle_list(&ctx, None),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Asks on stdin; anything but y/yes declines.
fn prompt_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

fn read_image(path: Option<PathBuf>) -> Result<Option<Vec<u8>>> {
    path.map(std::fs::read).transpose().map_err(Into::into)
}

fn print_result(result: &CmdResult) {
    print_messages(&result.messages);
}

fn handle_add(ctx: &mut AppContext, fields: PlantFields, image: Option<PathBuf>) -> Result<()> {
    let image = read_image(image)?;
    let result = ctx.api.add_plant(fields, image.as_deref())?;
    for plant in &result.affected_plants {
        println!("{}", plant.id);
    }
    print_result(&result);
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    id: &str,
    update: PlantUpdate,
    image: Option<PathBuf>,
) -> Result<()> {
    let image = read_image(image)?;
    let result = ctx.api.update_plant(id, update, image.as_deref())?;
    print_result(&result);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str, yes: bool) -> Result<()> {
    let result = if yes {
        ctx.api.delete_plant(id, &mut |_: &str| true)?
    } else {
        ctx.api.delete_plant(id, &mut prompt_stdin)?
    };
    print_result(&result);
    Ok(())
}

fn handle_show(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.show_plant(id)?;
    for plant in &result.affected_plants {
        print!("{}", render_plant(plant));
    }
    print_result(&result);
    Ok(())
}

fn handle_list(ctx: &AppContext, filter: Option<String>) -> Result<()> {
    let result = ctx.api.list_plants(filter.as_deref().unwrap_or(""))?;
    if let Some(listing) = &result.listing {
        print!("{}", render_listing(listing));
    }
    print_result(&result);
    Ok(())
}

fn handle_toggle(ctx: &mut AppContext, ids: Vec<String>, selected: bool) -> Result<()> {
    for id in ids {
        let result = ctx.api.toggle_selection(&id, selected)?;
        print_result(&result);
    }
    Ok(())
}

fn handle_select_all(ctx: &mut AppContext, filter: Option<String>) -> Result<()> {
    let result = ctx.api.select_matching(filter.as_deref().unwrap_or(""))?;
    print_result(&result);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.clear_selection()?;
    print_result(&result);
    Ok(())
}

fn handle_quantity(ctx: &mut AppContext, id: &str, quantity: i64) -> Result<()> {
    let result = ctx.api.set_quantity(id, quantity)?;
    print_result(&result);
    Ok(())
}

fn handle_basket(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.basket()?;
    if let Some(basket) = &result.basket {
        print!("{}", render_basket(basket));
    }
    print_result(&result);
    Ok(())
}

fn handle_delete_selected(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let result = if yes {
        ctx.api.bulk_delete_selected(&mut |_: &str| true)?
    } else {
        ctx.api.bulk_delete_selected(&mut prompt_stdin)?
    };
    print_result(&result);
    Ok(())
}

fn handle_export(ctx: &AppContext, basket: bool, out: Option<PathBuf>) -> Result<()> {
    let mode = if basket {
        ExportMode::Basket
    } else {
        ExportMode::Flat
    };
    let out_dir = out.unwrap_or_else(|| PathBuf::from("."));
    let result = ctx.api.export_pdf(mode, &out_dir)?;
    print_result(&result);
    Ok(())
}

fn handle_settings(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => SettingsAction::ShowAll,
        (Some(k), None) => SettingsAction::ShowKey(k),
        (Some(k), Some(v)) => SettingsAction::Set(k, v),
    };
    let show_all = matches!(action, SettingsAction::ShowAll);

    let result = ctx.api.settings_action(action)?;
    if show_all {
        if let Some(settings) = &result.settings {
            print!("{}", render_settings(settings));
        }
    }
    print_result(&result);
    Ok(())
}

fn handle_settings_reset(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.settings_action(SettingsAction::Reset)?;
    print_result(&result);
    Ok(())
}
