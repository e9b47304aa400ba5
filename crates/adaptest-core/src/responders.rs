//! Non-interactive answer providers.

use std::collections::VecDeque;

use crate::error::{CatError, CatResult};
use crate::model::Item;
use crate::traits::AnswerProvider;

/// Replays a fixed sequence of 0-based choices.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    choices: VecDeque<usize>,
}

impl ScriptedAnswers {
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }

    /// Choices not yet consumed.
    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl AnswerProvider for ScriptedAnswers {
    fn choose(&mut self, item: &Item) -> CatResult<usize> {
        let choice = self.choices.pop_front().ok_or(CatError::InputClosed)?;
        if choice >= item.options().len() {
            return Err(CatError::AnswerUnavailable {
                item_id: item.id(),
                attempts: 1,
            });
        }
        Ok(choice)
    }
}

/// Simulated examinee that answers correctly exactly when its ability is at
/// least the item's difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdResponder {
    pub true_theta: f64,
}

impl ThresholdResponder {
    pub fn new(true_theta: f64) -> Self {
        Self { true_theta }
    }
}

impl AnswerProvider for ThresholdResponder {
    fn choose(&mut self, item: &Item) -> CatResult<usize> {
        if self.true_theta >= item.params().b {
            Ok(item.correct())
        } else {
            // A single-option item has no wrong answer to pick.
            Ok((item.correct() + 1) % item.options().len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Session, SessionConfig, SessionState};
    use crate::model::{fixtures, Outcome};
    use crate::parser::builtin_bank;
    use crate::traits::NoopPresenter;

    #[test]
    fn scripted_answers_replay_in_order() {
        let item = fixtures::item(1, 1.0, 0.0, 0.2);
        let mut answers = ScriptedAnswers::new([2, 0]);
        assert_eq!(answers.choose(&item).unwrap(), 2);
        assert_eq!(answers.remaining(), 1);
        assert_eq!(answers.choose(&item).unwrap(), 0);
        assert!(matches!(answers.choose(&item), Err(CatError::InputClosed)));
    }

    #[test]
    fn scripted_answers_reject_out_of_range() {
        let item = fixtures::item(7, 1.0, 0.0, 0.2);
        let mut answers = ScriptedAnswers::new([9]);
        assert!(matches!(
            answers.choose(&item),
            Err(CatError::AnswerUnavailable { item_id: 7, .. })
        ));
    }

    #[test]
    fn threshold_responder_follows_difficulty() {
        let easy = fixtures::item(1, 1.0, -1.0, 0.2);
        let hard = fixtures::item(2, 1.0, 1.0, 0.2);
        let mut responder = ThresholdResponder::new(0.0);
        assert_eq!(easy.score(responder.choose(&easy).unwrap()), Outcome::Correct);
        assert_eq!(hard.score(responder.choose(&hard).unwrap()), Outcome::Incorrect);
    }

    #[test]
    fn simulated_sessions_are_deterministic() {
        let bank = builtin_bank().unwrap();
        let mut first = Session::new(&bank, SessionConfig::default());
        let mut second = Session::new(&bank, SessionConfig::default());
        first
            .run(&mut ThresholdResponder::new(0.3), &NoopPresenter)
            .unwrap();
        second
            .run(&mut ThresholdResponder::new(0.3), &NoopPresenter)
            .unwrap();
        assert_eq!(first.state(), SessionState::Complete);
        assert_eq!(first.trajectory(), second.trajectory());
    }

    #[test]
    fn stronger_examinee_ends_higher() {
        let bank = builtin_bank().unwrap();
        let mut strong = Session::new(&bank, SessionConfig::default());
        let mut weak = Session::new(&bank, SessionConfig::default());
        let strong = strong
            .run(&mut ThresholdResponder::new(3.0), &NoopPresenter)
            .unwrap();
        let weak = weak
            .run(&mut ThresholdResponder::new(-3.0), &NoopPresenter)
            .unwrap();
        assert!(strong.theta > weak.theta);
        assert!(strong.at_boundary);
        assert!(weak.at_boundary);
    }

    #[test]
    fn scripted_session_matches_manual_answers() {
        let bank = builtin_bank().unwrap();
        let mut session = Session::new(&bank, SessionConfig::default());
        let outcome = session
            .run(&mut ScriptedAnswers::new([0; 5]), &NoopPresenter)
            .unwrap();
        assert_eq!(outcome.rounds, 5);
        // Option 1 is never the key in the bundled bank.
        assert!(session
            .records()
            .iter()
            .all(|r| r.outcome == Outcome::Incorrect));
        assert!(outcome.theta < 0.0);
    }
}
