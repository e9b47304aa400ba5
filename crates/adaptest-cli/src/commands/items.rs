//! The `adaptest items` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::parser::load_item_bank;
use adaptest_core::selection::{information_table, select};

pub fn execute(bank_path: Option<PathBuf>, theta: f64) -> Result<()> {
    use comfy_table::{Cell, Table};

    anyhow::ensure!(theta.is_finite(), "theta must be a finite number");

    let bank = load_item_bank(bank_path.as_deref())?;
    let asked = HashSet::new();
    let next = select(&bank, &asked, theta).item().map(|item| item.id());

    println!("{} ({}): {} items", bank.name(), bank.id(), bank.len());
    if !bank.description().is_empty() {
        println!("{}", bank.description());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "a", "b", "c", "P(correct)", "Information", "Prompt"]);

    for candidate in information_table(&bank, &asked, theta) {
        let item = candidate.item;
        let marker = if Some(item.id()) == next { " *" } else { "" };
        table.add_row(vec![
            Cell::new(format!("{}{marker}", item.id())),
            Cell::new(format!("{:.2}", item.params().a)),
            Cell::new(format!("{:.2}", item.params().b)),
            Cell::new(format!("{:.2}", item.params().c)),
            Cell::new(format!("{:.3}", candidate.probability)),
            Cell::new(format!("{:.3}", candidate.information)),
            Cell::new(item.prompt()),
        ]);
    }

    println!("{table}");
    if let Some(id) = next {
        println!("* selected first at theta {theta:.3}: item {id}");
    }

    Ok(())
}
