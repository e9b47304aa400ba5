//! Collaborator traits for the session controller.
//!
//! The engine never reads input or formats text itself. It asks an
//! [`AnswerProvider`] for a validated choice and reports progress to a
//! [`Presenter`].

use crate::engine::SessionOutcome;
use crate::error::CatResult;
use crate::model::{AdministeredRecord, Item};

// ---------------------------------------------------------------------------
// Answer collaborator
// ---------------------------------------------------------------------------

/// Supplies the test-taker's answer to a presented item.
pub trait AnswerProvider {
    /// Return a 0-based option index, already range-checked against
    /// `item.options()`.
    fn choose(&mut self, item: &Item) -> CatResult<usize>;
}

// ---------------------------------------------------------------------------
// Presentation collaborator
// ---------------------------------------------------------------------------

/// Receives session progress for display.
pub trait Presenter {
    /// An item was selected and is about to be answered.
    fn present_item(&self, round: usize, item: &Item);

    /// A response was scored and the ability estimate recomputed.
    fn theta_updated(
        &self,
        round: usize,
        record: &AdministeredRecord<'_>,
        theta: f64,
        standard_error: Option<f64>,
    );

    /// The session reached a terminal state.
    fn finished(&self, outcome: &SessionOutcome);
}

/// Presenter that discards everything.
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn present_item(&self, _: usize, _: &Item) {}
    fn theta_updated(&self, _: usize, _: &AdministeredRecord<'_>, _: f64, _: Option<f64>) {}
    fn finished(&self, _: &SessionOutcome) {}
}
