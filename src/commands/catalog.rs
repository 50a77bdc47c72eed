//! Catalog command implementation

use std::path::Path;

use console::Style;

use super::helpers::{self, Services};
use crate::cli::{CatalogArgs, CatalogCommand, CatalogListArgs};
use crate::domain::CatalogEntry;
use crate::error::Result;

/// Run catalog command
pub fn run(config_path: Option<&Path>, args: CatalogArgs) -> Result<()> {
    match args.command {
        CatalogCommand::List(list_args) => list(config_path, &list_args),
    }
}

fn list(config_path: Option<&Path>, args: &CatalogListArgs) -> Result<()> {
    let services = Services::load(config_path)?;
    let entries = services.catalog.list(args.group.as_deref())?;

    if args.json {
        return helpers::print_json(&entries);
    }

    if entries.is_empty() {
        println!("No published applications.");
        return Ok(());
    }

    println!("Published applications ({}):", entries.len());
    println!();
    let mut current_group: Option<&str> = None;
    for entry in sorted(&entries) {
        if current_group != Some(entry.group.as_str()) {
            println!("  {}", Style::new().bold().yellow().apply_to(&entry.group));
            current_group = Some(entry.group.as_str());
        }
        print_entry(entry);
    }

    Ok(())
}

/// Entries grouped by delivery group, catalog order kept within a group
fn sorted(entries: &[CatalogEntry]) -> Vec<&CatalogEntry> {
    let mut sorted: Vec<&CatalogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.group.cmp(&b.group));
    sorted
}

fn print_entry(entry: &CatalogEntry) {
    let command = if entry.command_line.arguments.is_empty() {
        entry.command_line.executable.clone()
    } else {
        format!(
            "{} {}",
            entry.command_line.executable, entry.command_line.arguments
        )
    };
    println!(
        "    {} {}",
        Style::new().bold().apply_to(&entry.canonical_name),
        Style::new().dim().apply_to(format!("({})", entry.display_name))
    );
    println!("      {}", command);
}
