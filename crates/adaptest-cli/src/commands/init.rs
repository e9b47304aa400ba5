//! The `adaptest init` command.

use std::path::Path;

use anyhow::Result;

use adaptest_core::parser::parse_item_bank;

const CONFIG_PATH: &str = "adaptest.toml";
const BANK_PATH: &str = "item-banks/example.toml";

pub fn execute() -> Result<()> {
    write_unless_present(Path::new(CONFIG_PATH), SAMPLE_CONFIG)?;
    std::fs::create_dir_all("item-banks")?;
    write_unless_present(Path::new(BANK_PATH), EXAMPLE_BANK)?;

    // A kept bank from an earlier init may have been edited since.
    match parse_item_bank(Path::new(BANK_PATH)) {
        Ok(bank) => println!("Item bank '{}' has {} items.", bank.name(), bank.len()),
        Err(e) => {
            tracing::warn!(path = BANK_PATH, "example bank does not load");
            eprintln!("Warning: {e:#}");
        }
    }

    println!("\nTry a quiz:");
    println!("  adaptest items                   # information of each item at theta = 0");
    println!("  adaptest simulate --true-theta 1 # watch the estimate converge");
    println!("  adaptest run                     # answer {BANK_PATH} yourself");
    println!("\nCalibrate your own items (a, b, c) into {BANK_PATH} when ready.");

    Ok(())
}

fn write_unless_present(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

# Items administered before the quiz ends
max_items = 5

# Ability estimate before the first answer, and the search range
initial_theta = 0.0
theta_min = -4.0
theta_max = 4.0

# Ability search tolerance and evaluation budget
tolerance = 1e-5
max_evaluations = 500

# Invalid answers tolerated per item (remove for unlimited)
# max_attempts = 3

# Item bank used when --bank is not given
item_bank = "item-banks/example.toml"
"#;

const EXAMPLE_BANK: &str = adaptest_core::parser::BUILTIN_BANK;
