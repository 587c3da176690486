use anyhow::Result;

use culturevault_core::catalog::{continent_for_region, REGIONS};

use crate::config::Config;
use crate::dataset;

/// Print catalog entries in catalog order.
pub fn run_catalog_list(config: &Config, limit: Option<usize>) -> Result<()> {
    let catalog = dataset::load_catalog(config)?;
    let shown = limit.unwrap_or(catalog.len());

    for record in catalog.iter().take(shown) {
        println!(
            "{:<20} {} ({}, {})",
            record.id, record.name, record.country, record.region
        );
    }
    println!();
    println!("{} places.", catalog.len());
    Ok(())
}

/// Print every region with its continent and catalog entry count.
pub fn run_catalog_regions(config: &Config) -> Result<()> {
    let catalog = dataset::load_catalog(config)?;

    for region in REGIONS {
        let count = catalog.iter().filter(|r| r.region == region).count();
        println!(
            "{:<16} {:<14} {} places",
            region,
            continent_for_region(region),
            count
        );
    }
    Ok(())
}
