//! Maximum-likelihood ability estimation.
//!
//! The estimate is the minimizer of the negative log-likelihood of the scored
//! responses over a bounded ability range, recomputed from all records every
//! time it is requested. The search is argmin's bounded Brent solver.

use std::cmp::Ordering;

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentOpt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CatError, CatResult};
use crate::irt::{clip_probability, probability};
use crate::model::{AdministeredRecord, ItemParams};

/// Ability range and search settings for [`estimate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorOptions {
    /// Lower bound of the ability range.
    pub lower: f64,
    /// Upper bound of the ability range.
    pub upper: f64,
    /// Returned when there are no records to estimate from.
    pub initial_theta: f64,
    /// Absolute tolerance on the minimizer.
    pub tolerance: f64,
    /// Objective evaluations the search may spend, counting the first.
    pub max_evaluations: u32,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            lower: -4.0,
            upper: 4.0,
            initial_theta: 0.0,
            tolerance: 1e-5,
            max_evaluations: 500,
        }
    }
}

/// Result of an ability estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// The maximum-likelihood ability.
    pub theta: f64,
    /// Negative log-likelihood at `theta`.
    pub neg_log_likelihood: f64,
    /// Objective evaluations spent by the search.
    pub evaluations: u32,
    /// The optimum sits on an edge of the ability range, as happens with
    /// all-correct or all-incorrect response patterns.
    pub at_boundary: bool,
}

/// Negative log-likelihood of `records` at `theta`, summed in record order.
pub fn neg_log_likelihood(theta: f64, records: &[AdministeredRecord<'_>]) -> f64 {
    -records
        .iter()
        .map(|r| log_likelihood_term(theta, r.item.params(), r.outcome.as_u()))
        .sum::<f64>()
}

#[inline]
fn log_likelihood_term(theta: f64, params: &ItemParams, u: f64) -> f64 {
    let p = clip_probability(probability(theta, params));
    u * p.ln() + (1.0 - u) * (1.0 - p).ln()
}

#[derive(Debug, Error)]
#[error("negative log-likelihood not finite at theta = {theta}")]
struct NonFiniteObjective {
    theta: f64,
}

/// Negative log-likelihood over canonically ordered `(params, u)` terms.
struct Objective {
    terms: Vec<(ItemParams, f64)>,
}

impl CostFunction for Objective {
    type Param = f64;
    type Output = f64;

    fn cost(&self, theta: &f64) -> Result<f64, argmin::core::Error> {
        let value = -self
            .terms
            .iter()
            .map(|(params, u)| log_likelihood_term(*theta, params, *u))
            .sum::<f64>();
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NonFiniteObjective { theta: *theta }.into())
        }
    }
}

/// Estimate ability from the scored records.
///
/// The likelihood terms are summed in a canonical order, so any permutation
/// of `records` yields exactly the same estimate.
pub fn estimate(
    records: &[AdministeredRecord<'_>],
    options: &EstimatorOptions,
) -> CatResult<Estimate> {
    if records.is_empty() {
        return Ok(Estimate {
            theta: options.initial_theta,
            neg_log_likelihood: 0.0,
            evaluations: 0,
            at_boundary: false,
        });
    }
    if !(options.lower.is_finite() && options.upper.is_finite() && options.lower < options.upper)
    {
        return Err(CatError::EstimationFailure {
            evaluations: 0,
            reason: format!("invalid ability range [{}, {}]", options.lower, options.upper),
        });
    }

    let mut terms: Vec<(ItemParams, f64)> = records
        .iter()
        .map(|r| (*r.item.params(), r.outcome.as_u()))
        .collect();
    terms.sort_by(canonical_order);

    let solver = BrentOpt::new(options.lower, options.upper)
        .set_tolerance(f64::EPSILON.sqrt(), options.tolerance);
    // One evaluation happens before the first iteration.
    let max_iters = u64::from(options.max_evaluations.saturating_sub(1));

    let result = Executor::new(Objective { terms }, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()
        .map_err(|e| match e.downcast_ref::<NonFiniteObjective>() {
            Some(non_finite) => CatError::NumericDegeneracy(non_finite.to_string()),
            None => CatError::EstimationFailure {
                evaluations: 0,
                reason: e.to_string(),
            },
        })?;

    let state = result.state();
    let evaluations = state
        .get_func_counts()
        .get("cost_count")
        .map_or(0, |&n| u32::try_from(n).unwrap_or(u32::MAX));

    match state.get_termination_status() {
        TerminationStatus::Terminated(TerminationReason::SolverConverged) => {}
        status => {
            return Err(CatError::EstimationFailure {
                evaluations,
                reason: format!("search did not converge: {status:?}"),
            })
        }
    }

    let theta = match state.get_best_param() {
        Some(&theta) => theta,
        None => {
            return Err(CatError::EstimationFailure {
                evaluations,
                reason: "search produced no estimate".into(),
            })
        }
    };

    let edge = 10.0 * options.tolerance;
    let at_boundary = theta - options.lower <= edge || options.upper - theta <= edge;
    if at_boundary {
        tracing::warn!(
            theta,
            records = records.len(),
            "ability estimate is on the edge of the search range"
        );
    }

    Ok(Estimate {
        theta,
        neg_log_likelihood: state.get_best_cost(),
        evaluations,
        at_boundary,
    })
}

fn canonical_order(x: &(ItemParams, f64), y: &(ItemParams, f64)) -> Ordering {
    x.0.a
        .total_cmp(&y.0.a)
        .then(x.0.b.total_cmp(&y.0.b))
        .then(x.0.c.total_cmp(&y.0.c))
        .then(x.1.total_cmp(&y.1))
}
