use anyhow::{bail, Result};
use std::sync::Arc;

use culturevault_core::search::SearchMerge;
use culturevault_core::store::{HistoryStore, RemoteLookup, StashStore};

use crate::config::Config;
use crate::dataset;
use crate::gateway::{self, DisabledLookup};
use crate::stores::{FileHistory, FileStash};

/// Run one query through the merge engine and print the suggestion list.
///
/// `--select N` picks row N afterwards, recording it in history (and, for a
/// remote row, stashing its payload) exactly as tapping the row would.
pub async fn run_search(
    config: &Config,
    query: &str,
    select: Option<usize>,
    json: bool,
    local_only: bool,
) -> Result<()> {
    let catalog = Arc::new(dataset::load_catalog(config)?);

    let lookup: Arc<dyn RemoteLookup> = if local_only {
        Arc::new(DisabledLookup)
    } else {
        gateway::create_lookup(&config.gateway)?
    };
    let history: Arc<dyn HistoryStore> = Arc::new(FileHistory::new(&config.storage.data_dir));
    let stash: Arc<dyn StashStore> = Arc::new(FileStash::new(&config.storage.data_dir));

    let mut engine = SearchMerge::new(catalog, lookup, history, stash, config.search.to_options());

    engine.open();
    engine.on_query_changed(query);
    engine.settle().await;

    let results = engine.results();

    // An unfulfillable --select is an error even when the list is empty.
    if let Some(n) = select {
        if n == 0 || n > results.len() {
            bail!("--select {} is out of range (1..={})", n, results.len());
        }
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (i, suggestion) in results.iter().enumerate() {
            let marker = if suggestion.remote { " [remote]" } else { "" };
            println!(
                "{}. {}, {} ({}){}",
                i + 1,
                suggestion.name,
                suggestion.country,
                suggestion.region,
                marker
            );
        }
    }

    if let Some(n) = select {
        let choice = results[n - 1].clone();
        let destination = engine.select(&choice)?;
        println!("Selected: {}", choice.name);
        println!("    id: {}", destination);
    }

    Ok(())
}
