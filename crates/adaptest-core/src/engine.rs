//! Adaptive session controller.
//!
//! Each round selects the most informative unasked item, collects a validated
//! answer, scores it and re-estimates ability from every record so far. A
//! session ends `Complete` when the configured number of items has been
//! administered, or `Exhausted` when the bank runs out first. A failed
//! ability estimate leaves it `Aborted`.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatResult;
use crate::estimation::{estimate, Estimate, EstimatorOptions};
use crate::irt::standard_error;
use crate::model::{AdministeredRecord, ItemBank, ItemId};
use crate::report::SessionReport;
use crate::selection::{select, Selection};
use crate::traits::{AnswerProvider, Presenter};

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Number of items after which the session is complete.
    pub max_items: usize,
    /// Ability range, starting ability and search settings.
    pub estimator: EstimatorOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_items: 5,
            estimator: EstimatorOptions::default(),
        }
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// More items can be administered.
    Active,
    /// The bank ran out of unasked items.
    Exhausted,
    /// The configured number of items was administered.
    Complete,
    /// Ability estimation failed; no further items are administered.
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Active => write!(f, "active"),
            SessionState::Exhausted => write!(f, "exhausted"),
            SessionState::Complete => write!(f, "complete"),
            SessionState::Aborted => write!(f, "aborted"),
        }
    }
}

/// Result of a finished (or interrupted) session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub state: SessionState,
    /// Final ability estimate.
    pub theta: f64,
    /// Standard error at `theta`, if any administered item is informative.
    pub standard_error: Option<f64>,
    /// Items administered.
    pub rounds: usize,
    /// The final estimate lies on an edge of the ability range.
    pub at_boundary: bool,
}

/// A single test-taker's adaptive session over an item bank.
pub struct Session<'b> {
    id: Uuid,
    started_at: DateTime<Utc>,
    bank: &'b ItemBank,
    config: SessionConfig,
    records: Vec<AdministeredRecord<'b>>,
    asked: HashSet<ItemId>,
    trajectory: Vec<f64>,
    last_estimate: Option<Estimate>,
    theta: f64,
    state: SessionState,
}

impl<'b> Session<'b> {
    pub fn new(bank: &'b ItemBank, config: SessionConfig) -> Self {
        let theta = config.estimator.initial_theta;
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            bank,
            config,
            records: Vec::new(),
            asked: HashSet::new(),
            trajectory: Vec::new(),
            last_estimate: None,
            theta,
            state: SessionState::Active,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn bank(&self) -> &'b ItemBank {
        self.bank
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current ability estimate.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Administered records in administration order.
    pub fn records(&self) -> &[AdministeredRecord<'b>] {
        &self.records
    }

    /// Ability estimate after each round.
    pub fn trajectory(&self) -> &[f64] {
        &self.trajectory
    }

    pub fn asked_ids(&self) -> &HashSet<ItemId> {
        &self.asked
    }

    pub fn last_estimate(&self) -> Option<&Estimate> {
        self.last_estimate.as_ref()
    }

    /// Standard error of the current estimate over the administered items.
    pub fn standard_error(&self) -> Option<f64> {
        standard_error(self.theta, self.records.iter().map(|r| r.item))
    }

    /// Run one round. Returns the state after the round; terminal states are
    /// returned unchanged without consulting the collaborators.
    ///
    /// An answer error leaves the session as it was before the round. An
    /// estimation error also rolls the round back, then aborts the session.
    pub fn advance(
        &mut self,
        answers: &mut dyn AnswerProvider,
        presenter: &dyn Presenter,
    ) -> CatResult<SessionState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        if self.records.len() >= self.config.max_items {
            self.state = SessionState::Complete;
            return Ok(self.state);
        }

        let item = match select(self.bank, &self.asked, self.theta) {
            Selection::Next { item, .. } => item,
            Selection::Exhausted => {
                tracing::info!(
                    session = %self.id,
                    rounds = self.records.len(),
                    "item bank exhausted"
                );
                self.state = SessionState::Exhausted;
                return Ok(self.state);
            }
        };

        let round = self.records.len() + 1;
        presenter.present_item(round, item);
        let choice = answers.choose(item)?;
        let record = AdministeredRecord::score(item, choice);

        self.records.push(record);
        let estimate = match estimate(&self.records, &self.config.estimator) {
            Ok(estimate) => estimate,
            Err(e) => {
                self.records.pop();
                self.state = SessionState::Aborted;
                tracing::error!(session = %self.id, round, "ability estimation failed: {e}");
                return Err(e);
            }
        };

        self.asked.insert(item.id());
        self.theta = estimate.theta;
        self.trajectory.push(estimate.theta);
        self.last_estimate = Some(estimate);

        let se = self.standard_error();
        tracing::debug!(
            session = %self.id,
            round,
            item_id = item.id(),
            outcome = %record.outcome,
            theta = self.theta,
            "round scored"
        );
        presenter.theta_updated(round, &record, self.theta, se);

        if self.records.len() >= self.config.max_items {
            self.state = SessionState::Complete;
        }
        Ok(self.state)
    }

    /// Advance until the session reaches a terminal state.
    pub fn run(
        &mut self,
        answers: &mut dyn AnswerProvider,
        presenter: &dyn Presenter,
    ) -> CatResult<SessionOutcome> {
        while !self.advance(answers, presenter)?.is_terminal() {}

        let outcome = self.outcome();
        tracing::info!(
            session = %self.id,
            state = %outcome.state,
            rounds = outcome.rounds,
            theta = outcome.theta,
            "session finished"
        );
        presenter.finished(&outcome);
        Ok(outcome)
    }

    /// Snapshot of the session's current result.
    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            state: self.state,
            theta: self.theta,
            standard_error: self.standard_error(),
            rounds: self.records.len(),
            at_boundary: self.last_estimate.is_some_and(|e| e.at_boundary),
        }
    }

    /// Serializable summary of the session.
    pub fn report(&self) -> SessionReport {
        SessionReport::from_session(self)
    }
}
