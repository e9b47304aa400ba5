//! Three-parameter logistic (3PL) response model and Fisher information.
//!
//! `P(θ) = c + (1 - c) · σ(a · (θ - b))`

use crate::model::{Item, ItemParams};

/// Probabilities are clipped to `[EPSILON, 1 - EPSILON]` before taking logs
/// or ratios.
pub const EPSILON: f64 = 1e-6;

/// Logistic function, split on the sign of `x` so `exp` never overflows.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp_x = x.exp();
        exp_x / (1.0 + exp_x)
    }
}

/// Clamp a probability into `[EPSILON, 1 - EPSILON]`.
#[inline]
pub fn clip_probability(p: f64) -> f64 {
    p.clamp(EPSILON, 1.0 - EPSILON)
}

/// Probability of a correct response at ability `theta`.
#[inline]
pub fn probability(theta: f64, params: &ItemParams) -> f64 {
    let ItemParams { a, b, c } = *params;
    c + (1.0 - c) * sigmoid(a * (theta - b))
}

/// Fisher information of an item at ability `theta`.
///
/// `I(θ) = a² · (q / p) · ((p - c) / (1 - c))²`, evaluated on the clipped
/// probability. A non-finite value is reported as zero information.
pub fn item_information(theta: f64, params: &ItemParams) -> f64 {
    let ItemParams { a, c, .. } = *params;
    let p = clip_probability(probability(theta, params));
    let q = 1.0 - p;
    let scaled = (p - c) / (1.0 - c);
    let info = a * a * (q / p) * scaled * scaled;

    if info.is_finite() {
        info
    } else {
        tracing::warn!(theta, ?params, "non-finite item information, treating as zero");
        0.0
    }
}

/// Sum of item information over `items` at `theta`.
pub fn test_information<'a, I>(theta: f64, items: I) -> f64
where
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .map(|item| item_information(theta, item.params()))
        .sum()
}

/// Standard error of the ability estimate, `1 / sqrt(test information)`.
///
/// `None` when the administered items carry no information at `theta`.
pub fn standard_error<'a, I>(theta: f64, items: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Item>,
{
    let info = test_information(theta, items);
    (info > 0.0).then(|| 1.0 / info.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    fn params(a: f64, b: f64, c: f64) -> ItemParams {
        ItemParams { a, b, c }
    }

    #[test]
    fn worked_example() {
        let p = probability(0.0, &params(1.0, 0.0, 0.2));
        assert!((p - 0.6).abs() < 1e-12, "expected 0.6, got {p}");
    }

    #[test]
    fn midpoint_at_difficulty() {
        for &(a, b, c) in &[(1.0, 0.0, 0.2), (1.7, -1.3, 0.0), (0.4, 2.5, 0.35)] {
            assert_eq!(probability(b, &params(a, b, c)), c + (1.0 - c) / 2.0);
        }
    }

    #[test]
    fn strictly_increasing_and_bounded() {
        let p = params(1.2, 0.3, 0.2);
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=160 {
            let theta = -4.0 + step as f64 * 0.05;
            let value = probability(theta, &p);
            assert!(value > previous, "not increasing at theta={theta}");
            assert!(value >= p.c && value < 1.0, "out of range at theta={theta}");
            previous = value;
        }
    }

    #[test]
    fn extreme_ability_does_not_overflow() {
        let p = params(3.0, 0.0, 0.25);
        let low = probability(-1e6, &p);
        let high = probability(1e6, &p);
        assert!((low - 0.25).abs() < 1e-12);
        assert!(high.is_finite() && high <= 1.0);
    }

    #[test]
    fn information_peaks_near_difficulty() {
        let p = params(1.0, 0.0, 0.0);
        let at_b = item_information(0.0, &p);
        assert!((at_b - 0.25).abs() < 1e-9, "2PL information at b is a²/4");
        assert!(item_information(2.0, &p) < at_b);
        assert!(item_information(-2.0, &p) < at_b);
    }

    #[test]
    fn information_is_finite_at_extremes() {
        let p = params(2.5, 0.0, 0.2);
        for theta in [-1e6, -50.0, 50.0, 1e6] {
            let info = item_information(theta, &p);
            assert!(info.is_finite() && info >= 0.0, "theta={theta} info={info}");
        }
    }

    #[test]
    fn standard_error_from_information() {
        let items = [
            fixtures::item(1, 1.0, 0.0, 0.0),
            fixtures::item(2, 1.0, 0.0, 0.0),
        ];
        let se = standard_error(0.0, &items).unwrap();
        assert!((se - 1.0 / 0.5f64.sqrt()).abs() < 1e-9);

        let none: [Item; 0] = [];
        assert!(standard_error(0.0, &none).is_none());
    }
}
