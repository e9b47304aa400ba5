pub mod init;
pub mod items;
pub mod run;
pub mod simulate;

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::config::{load_config_from, AdaptestConfig};
use adaptest_core::model::ItemBank;
use adaptest_core::parser::load_item_bank;

/// Load config, apply command-line overrides and load the item bank.
pub(crate) fn prepare(
    config_path: Option<PathBuf>,
    bank: Option<PathBuf>,
    max_items: Option<usize>,
    max_attempts: Option<u32>,
) -> Result<(AdaptestConfig, ItemBank)> {
    let mut config = load_config_from(config_path.as_deref())?;

    if let Some(bank) = bank {
        config.item_bank = Some(bank);
    }
    if let Some(max_items) = max_items {
        config.max_items = max_items;
    }
    if max_attempts.is_some() {
        config.max_attempts = max_attempts;
    }
    config.validate()?;

    let bank = load_item_bank(config.item_bank.as_deref())?;
    tracing::debug!(
        bank = bank.id(),
        items = bank.len(),
        max_items = config.max_items,
        "prepared session"
    );
    Ok((config, bank))
}
