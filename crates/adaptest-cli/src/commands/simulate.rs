//! The `adaptest simulate` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::engine::Session;
use adaptest_core::report::SessionReport;
use adaptest_core::responders::ThresholdResponder;
use adaptest_core::traits::NoopPresenter;

pub fn execute(
    true_theta: f64,
    bank_path: Option<PathBuf>,
    max_items: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(true_theta.is_finite(), "true-theta must be a finite number");
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json"),
        "unknown format '{format}' (expected table or json)"
    );

    let (config, bank) = super::prepare(config_path, bank_path, max_items, None)?;

    let mut responder = ThresholdResponder::new(true_theta);
    let mut session = Session::new(&bank, config.session_config());
    session.run(&mut responder, &NoopPresenter)?;
    let report = session.report();

    match format.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => print_trajectory(&report, true_theta),
    }

    Ok(())
}

fn print_trajectory(report: &SessionReport, true_theta: f64) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Round", "Item", "Answer", "Result", "Theta"]);

    for round in &report.rounds {
        table.add_row(vec![
            Cell::new(round.round),
            Cell::new(round.item_id),
            Cell::new(round.choice),
            Cell::new(if round.correct { "correct" } else { "incorrect" }),
            Cell::new(format!("{:.3}", round.theta)),
        ]);
    }

    println!("{table}");
    println!(
        "\nSimulated {} items on '{}' (true theta {true_theta:.3}): {} correct, session {}",
        report.rounds.len(),
        report.bank_id,
        report.correct_count(),
        report.state,
    );
    match report.standard_error {
        Some(se) => println!("Final estimated ability (theta): {:.3} (SE {se:.3})", report.theta),
        None => println!("Final estimated ability (theta): {:.3}", report.theta),
    }
    if report.at_boundary {
        println!("Note: the estimate lies on the edge of the ability range.");
    }
}
