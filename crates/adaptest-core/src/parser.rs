//! TOML item bank parser.
//!
//! Loads item banks from TOML files. Every item is validated as the bank is
//! built, so a bank that loads is safe to hand to the engine.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::CatError;
use crate::model::{Item, ItemBank, ItemId, ItemParams};

/// The bundled english-grammar bank.
pub const BUILTIN_BANK: &str = include_str!("../../../item-banks/english-grammar.toml");

/// Intermediate TOML structure for parsing item bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: ItemId,
    a: f64,
    b: f64,
    c: f64,
    prompt: String,
    options: Vec<String>,
    /// 1-based, as displayed.
    correct: usize,
}

/// Parse a single TOML file into an `ItemBank`.
pub fn parse_item_bank(path: &Path) -> Result<ItemBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item bank file: {}", path.display()))?;

    parse_item_bank_str(&content, path)
}

/// Parse a TOML string into an `ItemBank`.
pub fn parse_item_bank_str(content: &str, source_path: &Path) -> Result<ItemBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let items = parsed
        .items
        .into_iter()
        .map(|i| {
            let params = ItemParams::new(i.id, i.a, i.b, i.c)?;
            let correct = i
                .correct
                .checked_sub(1)
                .ok_or_else(|| CatError::InvalidItemContent {
                    item_id: i.id,
                    reason: "correct is 1-based and must be at least 1".into(),
                })?;
            Item::new(i.id, params, i.prompt, i.options, correct)
        })
        .collect::<Result<Vec<_>, CatError>>()
        .with_context(|| format!("invalid item in {}", source_path.display()))?;

    let bank = ItemBank::new(
        parsed.bank.id,
        parsed.bank.name,
        parsed.bank.description,
        items,
    )
    .with_context(|| format!("invalid item bank: {}", source_path.display()))?;

    tracing::debug!(bank = bank.id(), items = bank.len(), "loaded item bank");
    Ok(bank)
}

/// The bundled english-grammar bank.
pub fn builtin_bank() -> Result<ItemBank> {
    parse_item_bank_str(BUILTIN_BANK, Path::new("<builtin>/english-grammar.toml"))
}

/// Load the bank at `path`, or the bundled bank when no path is given.
pub fn load_item_bank(path: Option<&Path>) -> Result<ItemBank> {
    match path {
        Some(path) => parse_item_bank(path),
        None => builtin_bank(),
    }
}
