use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "planten", bin_name = "planten", version)]
#[command(about = "Plant catalog with a selection basket and PDF export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the catalog data (overrides PLANTEN_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Catalog(CatalogCommands),

    #[command(flatten)]
    Selection(SelectionCommands),

    #[command(flatten)]
    Export(ExportCommands),
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Add a plant to the catalog
    #[command(display_order = 1)]
    Add {
        #[arg(long)]
        name: String,

        /// Kind of plant (e.g. "Vaste plant")
        #[arg(long)]
        kind: String,

        /// Unit price in euros
        #[arg(long)]
        price: f64,

        /// Botanical name
        #[arg(long)]
        botanical: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Photo file (PNG or JPEG), scaled down before storing
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },

    /// Edit a plant; only the given fields change
    #[command(alias = "e", display_order = 2)]
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        /// Botanical name (empty clears it)
        #[arg(long)]
        botanical: Option<String>,

        /// Description (empty clears it)
        #[arg(long)]
        description: Option<String>,

        /// Replacement photo file
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },

    /// Delete a plant
    #[command(alias = "rm", display_order = 3)]
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show one plant in full
    #[command(alias = "v", display_order = 4)]
    Show { id: String },

    /// List plants
    #[command(alias = "ls", display_order = 5)]
    List {
        /// Comma-separated terms; a plant matches when any term appears in it
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SelectionCommands {
    /// Add plants to the selection
    #[command(display_order = 10)]
    Select {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Remove plants from the selection
    #[command(display_order = 11)]
    Deselect {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Select exactly the plants the filter shows
    #[command(display_order = 12)]
    SelectAll {
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Clear the selection
    #[command(display_order = 13)]
    Clear,

    /// Set the basket quantity of a selected plant (1-999)
    #[command(display_order = 14)]
    Qty {
        id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Show the basket with quantities and totals
    #[command(display_order = 15)]
    Basket,

    /// Delete every selected plant from the catalog
    #[command(display_order = 16)]
    DeleteSelected {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the selection as a PDF catalog
    #[command(display_order = 20)]
    Export {
        /// Export the basket with quantities and totals
        #[arg(long)]
        basket: bool,

        /// Output directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Get or set export settings
    #[command(display_order = 21)]
    Settings {
        /// Setting key (e.g. title, font-size, col-name.prijs)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Restore the default export settings
    #[command(display_order = 22)]
    SettingsReset,
}
