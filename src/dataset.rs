use anyhow::{Context, Result};

use culturevault_core::catalog::Catalog;

use crate::config::Config;

/// Curated catalog compiled into the binary. `catalog.path` in the config
/// swaps in an external file with the same JSON shape.
const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.json");

pub fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog.path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
            Catalog::from_json(&content)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))
        }
        None => Catalog::from_json(BUNDLED_CATALOG).context("Failed to load bundled catalog"),
    }
}
