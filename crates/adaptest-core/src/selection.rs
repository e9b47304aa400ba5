//! Maximum-information item selection.

use std::collections::HashSet;

use crate::irt::{item_information, probability};
use crate::model::{Item, ItemBank, ItemId};

/// Outcome of an item selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'b> {
    /// The most informative unasked item.
    Next { item: &'b Item, information: f64 },
    /// Every item in the bank has been asked.
    Exhausted,
}

impl<'b> Selection<'b> {
    pub fn item(&self) -> Option<&'b Item> {
        match self {
            Selection::Next { item, .. } => Some(item),
            Selection::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Selection::Exhausted)
    }
}

/// A candidate item evaluated at some ability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateInfo<'b> {
    pub item: &'b Item,
    /// Probability of a correct response.
    pub probability: f64,
    /// Fisher information.
    pub information: f64,
}

/// Items whose id is not in `asked`, in bank order.
pub fn candidates<'b, 'a>(
    bank: &'b ItemBank,
    asked: &'a HashSet<ItemId>,
) -> impl Iterator<Item = &'b Item> + 'a
where
    'b: 'a,
{
    bank.items()
        .iter()
        .filter(move |item| !asked.contains(&item.id()))
}

/// Pick the unasked item with maximum Fisher information at `theta`.
///
/// Ties are broken by bank order: the first item reaching the maximum wins.
pub fn select<'b>(bank: &'b ItemBank, asked: &HashSet<ItemId>, theta: f64) -> Selection<'b> {
    let mut best: Option<(&'b Item, f64)> = None;

    for item in candidates(bank, asked) {
        let information = item_information(theta, item.params());
        match best {
            Some((_, best_info)) if information <= best_info => {}
            _ => best = Some((item, information)),
        }
    }

    match best {
        Some((item, information)) => {
            tracing::debug!(item_id = item.id(), information, theta, "selected item");
            Selection::Next { item, information }
        }
        None => Selection::Exhausted,
    }
}

/// Every unasked item with its response probability and information at
/// `theta`, in bank order.
pub fn information_table<'b>(
    bank: &'b ItemBank,
    asked: &HashSet<ItemId>,
    theta: f64,
) -> Vec<CandidateInfo<'b>> {
    candidates(bank, asked)
        .map(|item| CandidateInfo {
            item,
            probability: probability(theta, item.params()),
            information: item_information(theta, item.params()),
        })
        .collect()
}
