//! `boxprofile list`: show what each target's manifest records.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use boxprofile_core::{manifest, Artifact, ManifestEntry};
use boxprofile_sync::targets_for_query;

use super::TargetArgs;

/// Arguments for `boxprofile list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TargetListing {
    target: String,
    /// `false` when no manifest exists yet.
    synced: bool,
    #[serde(skip)]
    suffix: String,
    profiles: Vec<ManifestEntry>,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "target")]
    target: String,
    #[tabled(rename = "profile")]
    name: String,
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "command")]
    exec: String,
    #[tabled(rename = "icon")]
    icon: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let targets = targets_for_query(&home, &self.targets.targets)?;

        let mut listings = Vec::with_capacity(targets.len());
        for target in &targets {
            let manifest = manifest::load_at(target.directory())
                .with_context(|| format!("failed to read manifest for '{}'", target.name()))?;
            listings.push(TargetListing {
                target: target.name().to_string(),
                synced: manifest.is_some(),
                suffix: target.suffix().to_string(),
                profiles: manifest.map(|m| m.profiles).unwrap_or_default(),
            });
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&listings)?);
            return Ok(());
        }
        print_table(&listings);
        Ok(())
    }
}

fn print_table(listings: &[TargetListing]) {
    let mut rows = Vec::new();
    for listing in listings {
        if !listing.synced {
            println!(
                "{} '{}' has not been synced yet",
                "·".dimmed(),
                listing.target
            );
            continue;
        }
        rows.extend(listing.profiles.iter().map(Artifact::from).map(|a| ProfileRow {
            target: listing.target.clone(),
            name: a.friendly_name(),
            file: a.file_name(&listing.suffix),
            exec: a.exec_command,
            icon: a
                .icon
                .map(|i| i.display().to_string())
                .unwrap_or_else(|| "-".to_string()),
        }));
    }

    if rows.is_empty() {
        println!("No generated profiles.");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
