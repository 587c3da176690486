use anyhow::Result;

use culturevault_core::store::HistoryStore;

use crate::config::Config;
use crate::stores::FileHistory;

/// Print recent selections, most recent first.
pub fn run_history_list(config: &Config) -> Result<()> {
    let history = FileHistory::new(&config.storage.data_dir);
    let entries = history.get()?;

    if entries.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    for (i, name) in entries.iter().enumerate() {
        println!("{}. {}", i + 1, name);
    }
    Ok(())
}

pub fn run_history_clear(config: &Config) -> Result<()> {
    let history = FileHistory::new(&config.storage.data_dir);
    history.clear()?;
    println!("History cleared.");
    Ok(())
}
