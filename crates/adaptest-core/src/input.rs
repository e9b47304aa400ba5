//! Answer input boundary.
//!
//! Raw answers are parsed into typed [`AnswerInput`] values. An
//! [`AnswerSource`] produces them; [`ValidatedAnswers`] loops over a source
//! under a [`RetryPolicy`] and hands the engine only in-range choices.

use std::num::NonZeroU32;

use thiserror::Error;

use crate::error::{CatError, CatResult};
use crate::model::Item;
use crate::traits::AnswerProvider;

/// Why a raw answer was rejected. Choices are 1-based as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAnswer {
    #[error("Invalid input. Please enter a number from 1 to {option_count}.")]
    NotANumber { input: String, option_count: usize },

    #[error("Please enter a number from 1 to {option_count}.")]
    OutOfRange { choice: i64, option_count: usize },
}

/// A parsed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    /// 0-based option index.
    Valid(usize),
    Invalid(InvalidAnswer),
}

/// Parse a 1-based answer typed by the test-taker.
pub fn parse_choice(raw: &str, option_count: usize) -> AnswerInput {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(choice) if choice >= 1 && (choice as u64) <= option_count as u64 => {
            AnswerInput::Valid((choice - 1) as usize)
        }
        Ok(choice) => AnswerInput::Invalid(InvalidAnswer::OutOfRange {
            choice,
            option_count,
        }),
        Err(_) => AnswerInput::Invalid(InvalidAnswer::NotANumber {
            input: trimmed.to_string(),
            option_count,
        }),
    }
}

/// How many invalid answers to tolerate per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    #[default]
    Unlimited,
    /// Give up after this many attempts, counting the first.
    MaxAttempts(NonZeroU32),
}

impl RetryPolicy {
    /// `None` or `Some(0)` means unlimited.
    pub fn from_max_attempts(max_attempts: Option<u32>) -> Self {
        match max_attempts.and_then(NonZeroU32::new) {
            Some(n) => RetryPolicy::MaxAttempts(n),
            None => RetryPolicy::Unlimited,
        }
    }

    fn allows(&self, attempts: u32) -> bool {
        match self {
            RetryPolicy::Unlimited => true,
            RetryPolicy::MaxAttempts(max) => attempts < max.get(),
        }
    }
}

/// Produces parsed answers for an item, one attempt per call.
pub trait AnswerSource {
    /// Read one answer. `Ok(None)` means the input is closed.
    fn read_answer(&mut self, item: &Item) -> CatResult<Option<AnswerInput>>;

    /// Called after an invalid answer, before the next attempt.
    fn reject(&mut self, _item: &Item, _reason: &InvalidAnswer) {}
}

/// Adapts an [`AnswerSource`] into an [`AnswerProvider`] by retrying invalid
/// answers according to a [`RetryPolicy`].
pub struct ValidatedAnswers<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: AnswerSource> ValidatedAnswers<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: AnswerSource> AnswerProvider for ValidatedAnswers<S> {
    fn choose(&mut self, item: &Item) -> CatResult<usize> {
        let option_count = item.options().len();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let reason = match self.source.read_answer(item)? {
                None => return Err(CatError::InputClosed),
                Some(AnswerInput::Valid(index)) if index < option_count => return Ok(index),
                Some(AnswerInput::Valid(index)) => InvalidAnswer::OutOfRange {
                    choice: index as i64 + 1,
                    option_count,
                },
                Some(AnswerInput::Invalid(reason)) => reason,
            };

            tracing::debug!(item_id = item.id(), attempts, %reason, "rejected answer");
            if !self.policy.allows(attempts) {
                return Err(CatError::AnswerUnavailable {
                    item_id: item.id(),
                    attempts,
                });
            }
            self.source.reject(item, &reason);
        }
    }
}
