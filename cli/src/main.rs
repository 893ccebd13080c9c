mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{cmd_add, cmd_init, cmd_list, cmd_show};
use crate::config::Config;
use larder_core::service::CatalogService;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "A simple, local-first recipe catalog CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop, recreate, and seed all tables (resets the catalog)
    Init,
    /// Add a new recipe (scalar fields only; no steps or ingredients)
    Add {
        /// Recipe name
        name: String,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
        /// Number of servings
        #[arg(long)]
        servings: String,
        /// Prep time in minutes (blank means 0)
        #[arg(long, default_value = "")]
        prep: String,
        /// Cook time in minutes (blank means 0)
        #[arg(long, default_value = "")]
        cook: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes (ids and names only)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one recipe with its steps, ingredients, and categories
    Show {
        /// Recipe ID
        recipe_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
        .ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut service = CatalogService::new(&config.db_path)?;

    match cli.command {
        Commands::Init => cmd_init(&mut service),
        Commands::Add {
            name,
            notes,
            servings,
            prep,
            cook,
            json,
        } => cmd_add(
            &mut service,
            &name,
            notes.as_deref(),
            &servings,
            &prep,
            &cook,
            json,
        ),
        Commands::List { json } => cmd_list(&mut service, json),
        Commands::Show { recipe_id, json } => cmd_show(&mut service, recipe_id, json),
    }
}
