//! Place display by id.
//!
//! Resolves an id against the catalog first and the stash second, so a
//! remote selection made moments ago can be shown like any catalog entry.
//! Reading from the stash consumes the payload.

use anyhow::{bail, Result};

use culturevault_core::models::PlaceInfo;
use culturevault_core::store::StashStore;

use crate::config::Config;
use crate::dataset;
use crate::stores::FileStash;

/// Core resolve function returning structured data (used by CLI and server).
pub fn get_place(config: &Config, id: &str) -> Result<PlaceInfo> {
    let catalog = dataset::load_catalog(config)?;
    if let Some(record) = catalog.get(id) {
        return Ok(record.clone());
    }

    let stash = FileStash::new(&config.storage.data_dir);
    if let Some(info) = stash.take(id)? {
        return Ok(info);
    }

    bail!("place not found: {}", id);
}

/// CLI entry point. Prints the place, or the raw JSON with `--json`.
pub fn run_show(config: &Config, id: &str, json: bool) -> Result<()> {
    let place = match get_place(config, id) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&place)?);
        return Ok(());
    }

    println!("--- Place ---");
    println!("id:          {}", place.id);
    println!("name:        {}", place.name);
    println!("country:     {}", place.country);
    println!("region:      {}", place.region);
    println!("continent:   {}", place.continent);
    if !place.population.is_empty() {
        println!("population:  {}", place.population);
    }
    if !place.languages.is_empty() {
        println!("languages:   {}", place.languages.join(", "));
    }
    println!("coordinates: {}, {}", place.lat, place.lng);
    println!();

    if !place.cultures.is_empty() {
        println!("--- Cultures ({}) ---", place.cultures.len());
        for culture in &place.cultures {
            println!("[{}] {}", culture.category, culture.title);
            println!("    {}", culture.description);
            if let Some(ref religion) = culture.religion {
                println!("    religion: {}", religion);
            }
            if let Some(ref date) = culture.celebration_date {
                println!("    celebrated: {}", date);
            }
        }
        println!();
    }

    if !place.festivals.is_empty() {
        println!("--- Festivals ({}) ---", place.festivals.len());
        for festival in &place.festivals {
            println!("{} ({})", festival.name, festival.date);
            println!("    {}", festival.description);
        }
        println!();
    }

    let highlights: [(&str, &Vec<String>); 7] = [
        ("tourist places", &place.tourist_places),
        ("famous food", &place.famous_food),
        ("restaurants", &place.famous_restaurants),
        ("beaches", &place.beaches),
        ("rivers", &place.rivers),
        ("parks", &place.parks),
        ("malls", &place.malls),
    ];
    if highlights.iter().any(|(_, list)| !list.is_empty()) {
        println!("--- Highlights ---");
        for (label, list) in highlights {
            if !list.is_empty() {
                println!("{}: {}", label, list.join(", "));
            }
        }
        println!();
    }

    if let Some(ref history) = place.history {
        println!("--- History ---");
        println!("{}", history);
        println!();
    }
    if let Some(ref dressing) = place.dressing_style {
        println!("--- Dressing Style ---");
        println!("{}", dressing);
        println!();
    }
    if let Some(ref traditions) = place.traditions {
        println!("--- Traditions ---");
        println!("{}", traditions);
        println!();
    }
    if let Some(ref practices) = place.practices {
        println!("--- Practices ---");
        println!("{}", practices);
        println!();
    }

    Ok(())
}
