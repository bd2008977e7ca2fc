//! mapembed - geometry intake pipeline for embedded map data.

mod cli;
mod config;
mod embed;
mod geo;
mod logger;
mod markup;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use embed::{EmbedProcessor, PageManifest, sanitize_only};
use geo::hash::hash_group;
use geo::markers::{self, CounterState};
use serde::Serialize;
use serde_json::{Value, json};
use state::{GroupMap, PageState, select_groups};
use std::{
    fs,
    io::{self, Read},
    path::Path,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Sanitize { input } => {
            let processor = EmbedProcessor::from_config(&config);
            let response = sanitize_only(processor.intake(), &read_input(input)?);
            print_json(&response)
        }
        Commands::Page {
            manifest,
            preview,
            state,
        } => process_page(&config, manifest, *preview, *state),
        Commands::Hash { input } => {
            let processor = EmbedProcessor::from_config(&config);
            let text = read_input(input)?;
            let mut items = processor.intake().parse(Some(&text))?.items;
            markers::assign(&mut items, &mut CounterState::new());
            println!("{}", hash_group(&items));
            Ok(())
        }
        Commands::Groups { stored, ids, state } => {
            let text = read_input(stored)?;
            let stored = if *state {
                PageState::from_persisted(&text)
                    .context("invalid persisted page state")?
                    .groups()
                    .clone()
            } else {
                serde_json::from_str::<GroupMap>(&text)
                    .context("stored group data must be a JSON object of arrays")?
            };
            print_json(&select_groups(&stored, ids))
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load_or_default(&cli.config)?;
    if config.config_path.as_os_str().is_empty() {
        log!("config"; "{} not found, using defaults", cli.config.display());
    }
    config.validate()?;
    Ok(config)
}

/// Run every embed of a manifest through one page state, in order.
fn process_page(
    config: &SiteConfig,
    manifest: &Path,
    preview: bool,
    with_state: bool,
) -> Result<()> {
    let manifest = PageManifest::from_str(&read_input(manifest)?)
        .with_context(|| format!("invalid page manifest {}", manifest.display()))?;
    let processor = EmbedProcessor::from_config(config);
    let mut page = PageState::new();

    let embeds: Vec<Value> = manifest
        .embed
        .iter()
        .map(|request| match processor.process(&mut page, request) {
            Ok(outcome) => json!({
                "group": outcome.group_id,
                "shown": outcome.shown_groups,
                "marker": outcome.first_marker.map(|marker| json!({
                    "label": marker.label(),
                    "properties": marker.properties,
                })),
            }),
            Err(err) => json!({ "error": err.to_html() }),
        })
        .collect();

    let persisted = with_state
        .then(|| serde_json::from_str::<Value>(&page.to_persisted()))
        .transpose()?;
    let payload = page.finalize(preview);

    let mut report = json!({ "embeds": embeds, "payload": payload });
    if let Some(persisted) = persisted {
        report["state"] = persisted;
    }
    print_json(&report)
}

/// Read a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
