//! Engine error types.
//!
//! Item-bank problems are rejected when the bank is built, estimation
//! failures abort the session that hit them, and input failures come from
//! the answer boundary. Running out of items is not an error: see
//! [`Selection::Exhausted`](crate::selection::Selection::Exhausted).

use thiserror::Error;

use crate::model::ItemId;

/// Errors produced by the adaptive testing engine.
#[derive(Debug, Error)]
pub enum CatError {
    /// An item's 3PL parameters are out of range (`a <= 0`, `c` outside `[0, 1)`,
    /// or a non-finite value).
    #[error("item {item_id}: invalid parameters: {reason}")]
    InvalidItemParameters { item_id: ItemId, reason: String },

    /// Two items in one bank share an identifier.
    #[error("duplicate item id: {0}")]
    DuplicateItemId(ItemId),

    /// An item's presentation payload cannot be scored (e.g. the correct
    /// option index points outside the option list).
    #[error("item {item_id}: invalid content: {reason}")]
    InvalidItemContent { item_id: ItemId, reason: String },

    /// A computed quantity was NaN or infinite after clipping.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// The bounded search could not produce a minimizer.
    #[error("ability estimation failed after {evaluations} evaluations: {reason}")]
    EstimationFailure { evaluations: u32, reason: String },

    /// The answer source kept producing invalid answers past the retry policy.
    #[error("no valid answer for item {item_id} after {attempts} attempts")]
    AnswerUnavailable { item_id: ItemId, attempts: u32 },

    /// The answer source has no more input.
    #[error("answer input closed")]
    InputClosed,

    /// Reading from the answer source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CatResult<T> = Result<T, CatError>;
