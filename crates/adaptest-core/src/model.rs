//! Core data model types for adaptest.
//!
//! Items carry 3PL parameters plus an opaque presentation payload. Banks are
//! built once through validating constructors and never mutated afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatError, CatResult};

/// Identifier of an item, unique within a bank.
pub type ItemId = u32;

/// 3PL item parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemParams {
    /// Discrimination (slope), must be positive.
    pub a: f64,
    /// Difficulty (location).
    pub b: f64,
    /// Guessing floor (lower asymptote), in `[0, 1)`.
    pub c: f64,
}

impl ItemParams {
    /// Build a parameter set, rejecting values the response model cannot use.
    pub fn new(item_id: ItemId, a: f64, b: f64, c: f64) -> CatResult<Self> {
        let params = Self { a, b, c };
        params.validate(item_id)?;
        Ok(params)
    }

    /// Check the parameter ranges for the item with the given id.
    pub fn validate(&self, item_id: ItemId) -> CatResult<()> {
        let invalid = |reason: String| CatError::InvalidItemParameters { item_id, reason };

        if !self.a.is_finite() || self.a <= 0.0 {
            return Err(invalid(format!(
                "discrimination a must be positive, got {}",
                self.a
            )));
        }
        if !self.b.is_finite() {
            return Err(invalid(format!(
                "difficulty b must be finite, got {}",
                self.b
            )));
        }
        if !(0.0..1.0).contains(&self.c) {
            return Err(invalid(format!(
                "guessing c must be in [0, 1), got {}",
                self.c
            )));
        }
        Ok(())
    }
}

/// A single calibrated question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    id: ItemId,
    params: ItemParams,
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl Item {
    /// Build an item. `correct` is the 0-based index of the correct option.
    pub fn new(
        id: ItemId,
        params: ItemParams,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> CatResult<Self> {
        params.validate(id)?;
        if options.is_empty() {
            return Err(CatError::InvalidItemContent {
                item_id: id,
                reason: "item has no options".into(),
            });
        }
        if correct >= options.len() {
            return Err(CatError::InvalidItemContent {
                item_id: id,
                reason: format!(
                    "correct option {} is outside the {} available options",
                    correct + 1,
                    options.len()
                ),
            });
        }
        Ok(Self {
            id,
            params,
            prompt: prompt.into(),
            options,
            correct,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn params(&self) -> &ItemParams {
        &self.params
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// 0-based index of the correct option.
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Score a 0-based choice against this item's key.
    pub fn score(&self, choice: usize) -> Outcome {
        if choice == self.correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

/// An ordered, read-only collection of items.
#[derive(Debug, Clone)]
pub struct ItemBank {
    id: String,
    name: String,
    description: String,
    items: Vec<Item>,
}

impl ItemBank {
    /// Build a bank. Item order is preserved and is the tie-break order for
    /// item selection.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        items: Vec<Item>,
    ) -> CatResult<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            item.params.validate(item.id)?;
            if !seen.insert(item.id) {
                return Err(CatError::DuplicateItemId(item.id));
            }
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            items,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Binary outcome of a scored response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Incorrect,
    Correct,
}

impl Outcome {
    /// The outcome as `u` in the likelihood, 0 or 1.
    pub fn as_u(self) -> f64 {
        match self {
            Outcome::Correct => 1.0,
            Outcome::Incorrect => 0.0,
        }
    }

    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// An administered item together with the scored response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdministeredRecord<'b> {
    /// The item that was presented.
    pub item: &'b Item,
    /// The 0-based option the test-taker chose.
    pub choice: usize,
    /// Whether the choice matched the key.
    pub outcome: Outcome,
}

impl<'b> AdministeredRecord<'b> {
    /// Score `choice` against `item` and record it.
    pub fn score(item: &'b Item, choice: usize) -> Self {
        Self {
            item,
            choice,
            outcome: item.score(choice),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_reject_non_positive_discrimination() {
        let err = ItemParams::new(7, 0.0, 0.0, 0.2).unwrap_err();
        assert!(matches!(
            err,
            CatError::InvalidItemParameters { item_id: 7, .. }
        ));
        assert!(ItemParams::new(7, -1.0, 0.0, 0.2).is_err());
        assert!(ItemParams::new(7, f64::NAN, 0.0, 0.2).is_err());
    }

    #[test]
    fn params_reject_guessing_outside_unit_interval() {
        assert!(ItemParams::new(1, 1.0, 0.0, 1.0).is_err());
        assert!(ItemParams::new(1, 1.0, 0.0, -0.1).is_err());
        assert!(ItemParams::new(1, 1.0, 0.0, 0.0).is_ok());
        assert!(ItemParams::new(1, 1.0, 0.0, 0.99).is_ok());
    }

    #[test]
    fn params_reject_non_finite_difficulty() {
        assert!(ItemParams::new(1, 1.0, f64::INFINITY, 0.2).is_err());
    }

    #[test]
    fn item_rejects_out_of_range_key() {
        let params = ItemParams::new(1, 1.0, 0.0, 0.2).unwrap();
        let err = Item::new(1, params, "q", vec!["x".into(), "y".into()], 2).unwrap_err();
        assert!(matches!(err, CatError::InvalidItemContent { item_id: 1, .. }));
    }

    #[test]
    fn item_scores_choice_against_key() {
        let item = fixtures::item(1, 1.0, 0.0, 0.2);
        assert_eq!(item.score(0), Outcome::Correct);
        assert_eq!(item.score(3), Outcome::Incorrect);
    }

    #[test]
    fn bank_rejects_duplicate_ids() {
        let err = ItemBank::new(
            "dupes",
            "Dupes",
            "",
            vec![
                fixtures::item(1, 1.0, 0.0, 0.2),
                fixtures::item(1, 1.2, 0.5, 0.2),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CatError::DuplicateItemId(1)));
    }

    #[test]
    fn bank_preserves_order_and_lookup() {
        let bank = fixtures::bank(vec![
            fixtures::item(9, 1.0, 0.0, 0.2),
            fixtures::item(2, 1.0, 1.0, 0.2),
        ]);
        let ids: Vec<ItemId> = bank.items().iter().map(Item::id).collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(bank.get(2).map(|i| i.params().b), Some(1.0));
        assert!(bank.get(5).is_none());
    }

    #[test]
    fn outcome_as_u() {
        assert_eq!(Outcome::Correct.as_u(), 1.0);
        assert_eq!(Outcome::Incorrect.as_u(), 0.0);
        assert_eq!(Outcome::Correct.to_string(), "correct");
    }
}
