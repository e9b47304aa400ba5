//! End-to-end session tests against the bundled item bank.
//!
//! These tests drive the library the same way the CLI does and check that
//! the binary's JSON report agrees with an in-process session.

use std::path::Path;

use adaptest_core::engine::{Session, SessionConfig, SessionState};
use adaptest_core::parser::{builtin_bank, parse_item_bank};
use adaptest_core::report::SessionReport;
use adaptest_core::responders::{ScriptedAnswers, ThresholdResponder};
use adaptest_core::traits::NoopPresenter;
use assert_cmd::Command;

fn bank_file() -> &'static Path {
    Path::new("../../item-banks/english-grammar.toml")
}

#[test]
fn bundled_bank_file_matches_builtin() {
    let from_file = parse_item_bank(bank_file()).unwrap();
    let builtin = builtin_bank().unwrap();
    assert_eq!(from_file.id(), builtin.id());
    assert_eq!(from_file.items(), builtin.items());
}

#[test]
fn simulated_report_matches_library_session() {
    let bank = builtin_bank().unwrap();
    let mut session = Session::new(&bank, SessionConfig::default());
    session
        .run(&mut ThresholdResponder::new(-0.7), &NoopPresenter)
        .unwrap();
    let expected = session.report();

    #[allow(deprecated)]
    let output = Command::cargo_bin("adaptest")
        .unwrap()
        .env_remove("ADAPTEST_MAX_ITEMS")
        .env_remove("ADAPTEST_ITEM_BANK")
        .arg("simulate")
        .arg("--true-theta=-0.7")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let actual: SessionReport = serde_json::from_slice(&output).unwrap();

    assert_eq!(actual.state, expected.state);
    assert_eq!(actual.rounds.len(), expected.rounds.len());
    for (a, e) in actual.rounds.iter().zip(&expected.rounds) {
        assert_eq!(a.item_id, e.item_id);
        assert_eq!(a.correct, e.correct);
        assert!((a.theta - e.theta).abs() < 1e-12);
    }
    assert!((actual.theta - expected.theta).abs() < 1e-12);
    assert_ne!(actual.id, expected.id);
}

#[test]
fn scripted_session_over_every_item() {
    let bank = parse_item_bank(bank_file()).unwrap();
    let config = SessionConfig {
        max_items: 10,
        ..Default::default()
    };
    let mut session = Session::new(&bank, config);
    let outcome = session
        .run(&mut ScriptedAnswers::new([0, 1, 2, 3, 0]), &NoopPresenter)
        .unwrap();

    assert_eq!(outcome.state, SessionState::Exhausted);
    assert_eq!(outcome.rounds, 5);
    let mut ids: Vec<_> = session.records().iter().map(|r| r.item.id()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}
