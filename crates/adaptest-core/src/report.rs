//! Serializable session summary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Session, SessionState};
use crate::model::ItemId;

/// Summary of one administered round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based round number.
    pub round: usize,
    pub item_id: ItemId,
    /// 1-based option the test-taker chose.
    pub choice: usize,
    pub correct: bool,
    /// Ability estimate after this round.
    pub theta: f64,
}

/// A complete session report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique session identifier.
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Identifier of the item bank the session drew from.
    pub bank_id: String,
    pub state: SessionState,
    /// Final ability estimate.
    pub theta: f64,
    pub standard_error: Option<f64>,
    /// The final estimate lies on an edge of the ability range.
    pub at_boundary: bool,
    pub rounds: Vec<RoundSummary>,
}

impl SessionReport {
    pub fn from_session(session: &Session<'_>) -> Self {
        let outcome = session.outcome();
        let rounds = session
            .records()
            .iter()
            .zip(session.trajectory())
            .enumerate()
            .map(|(i, (record, &theta))| RoundSummary {
                round: i + 1,
                item_id: record.item.id(),
                choice: record.choice + 1,
                correct: record.outcome.is_correct(),
                theta,
            })
            .collect();

        Self {
            id: session.id(),
            started_at: session.started_at(),
            finished_at: Utc::now(),
            bank_id: session.bank().id().to_string(),
            state: outcome.state,
            theta: outcome.theta,
            standard_error: outcome.standard_error,
            at_boundary: outcome.at_boundary,
            rounds,
        }
    }

    /// Number of correct responses.
    pub fn correct_count(&self) -> usize {
        self.rounds.iter().filter(|r| r.correct).count()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize session report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SessionConfig;
    use crate::error::CatResult;
    use crate::model::{fixtures, Item};
    use crate::traits::{AnswerProvider, NoopPresenter};

    struct Always(usize);

    impl AnswerProvider for Always {
        fn choose(&mut self, _item: &Item) -> CatResult<usize> {
            Ok(self.0)
        }
    }

    #[test]
    fn report_mirrors_session() {
        let bank = fixtures::bank(vec![
            fixtures::item(1, 1.0, 0.0, 0.2),
            fixtures::item(2, 1.0, 1.0, 0.2),
        ]);
        let mut session = Session::new(&bank, SessionConfig::default());
        session.run(&mut Always(1), &NoopPresenter).unwrap();

        let report = session.report();
        assert_eq!(report.id, session.id());
        assert_eq!(report.bank_id, "fixture");
        assert_eq!(report.state, SessionState::Exhausted);
        assert_eq!(report.rounds.len(), 2);
        assert_eq!(report.rounds[0].choice, 2);
        assert_eq!(report.correct_count(), 0);
        assert_eq!(report.rounds[1].theta, report.theta);
        assert!(report.at_boundary);
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn report_json_uses_lowercase_state() {
        let bank = fixtures::bank(vec![fixtures::item(1, 1.0, 0.0, 0.2)]);
        let mut session = Session::new(&bank, SessionConfig::default());
        session.run(&mut Always(0), &NoopPresenter).unwrap();

        let json = session.report().to_json().unwrap();
        assert!(json.contains("\"state\": \"exhausted\""));
        let parsed: SessionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rounds[0].item_id, 1);
        assert!(parsed.rounds[0].correct);
    }
}
