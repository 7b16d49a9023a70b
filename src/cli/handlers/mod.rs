use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::catalog_io::load_catalog;
use crate::io::config_io::{self, DEFAULT_CONFIG};
use crate::model::Catalog;
use crate::ops::filter::{FilterEngine, FilterState};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a non-interactive subcommand
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    match cli.command {
        None => Err("no subcommand given".into()),
        Some(Commands::Config) => cmd_config(cli.config.as_deref()),
        Some(Commands::List(args)) => cmd_list(&load_catalog(cli.catalog.as_deref())?, args, json),
        Some(Commands::Tags) => cmd_tags(&load_catalog(cli.catalog.as_deref())?, json),
        Some(Commands::Show(args)) => cmd_show(&load_catalog(cli.catalog.as_deref())?, args, json),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(catalog: &Catalog, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !catalog.tags().contains(&args.tag) {
        tracing::warn!(tag = %args.tag, "tag not in catalog");
    }
    let state = FilterState::new(&args.query, &args.tag);
    let mut engine = FilterEngine::new();
    let indices = engine.apply(catalog, &state).to_vec();

    if json {
        let list = entry_list_json(catalog, &state, &indices);
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        println!("{}", format_entry_list(catalog, &indices));
    }
    Ok(())
}

fn cmd_tags(catalog: &Catalog, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let tags: Vec<&str> = catalog.tags().iter().collect();
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        println!("{}", format_tags(catalog.tags()));
    }
    Ok(())
}

fn cmd_show(catalog: &Catalog, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let entry = catalog
        .find_by_title(&args.title)
        .and_then(|i| catalog.entry(i))
        .ok_or_else(|| format!("no entry titled \"{}\"", args.title))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry_to_json(entry, true))?);
    } else {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn cmd_config(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        // The built-in template carries comments; print it as is
        None => print!("{}", DEFAULT_CONFIG),
        Some(path) => {
            let config = config_io::read_config(Some(path))?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
