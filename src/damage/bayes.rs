//! Bayesian damage-state update and reliability-index damage factor shared by
//! the wall-loss mechanisms (thinning, external corrosion, CUI).
//!
//! Three damage states are considered: the observed rate is right (state 1),
//! up to twice as high (state 2), or up to four times as high (state 3).
//! Inspection history updates the prior probability of each state; the
//! damage factor is the posterior-weighted probability of failure divided by
//! the generic failure probability at which the factor equals one.

use crate::core::{DataConfidence, InspectionCounts, PriorConfidence};

/// Damage-state multipliers on the observed corrosion rate.
pub const DAMAGE_STATES: [f64; 3] = [1.0, 2.0, 4.0];

const COV_THICKNESS: f64 = 0.20;
const COV_FLOW_STRESS: f64 = 0.20;
const COV_PRESSURE: f64 = 0.05;

/// Failure probability that maps to a damage factor of one.
pub const REFERENCE_FAILURE_PROBABILITY: f64 = 1.56e-4;

/// Allowable stress as a fraction of flow stress for common ferritic steels.
pub const STRESS_TO_FLOW_RATIO: f64 = 1.0 / 3.0;

/// Minimum structural thickness (mm).
pub const MIN_STRUCTURAL_THICKNESS_MM: f64 = 2.54;

pub fn prior_probabilities(confidence: PriorConfidence) -> [f64; 3] {
    match confidence {
        PriorConfidence::Low => [0.5, 0.3, 0.2],
        PriorConfidence::Medium => [0.7, 0.2, 0.1],
        PriorConfidence::High => [0.8, 0.15, 0.05],
    }
}

/// Probability that an inspection of the given class reports each state.
pub fn conditional_probabilities(class: DataConfidence) -> [f64; 3] {
    match class {
        DataConfidence::A => [0.9, 0.09, 0.01],
        DataConfidence::B => [0.7, 0.2, 0.1],
        DataConfidence::C => [0.5, 0.3, 0.2],
        DataConfidence::D => [0.4, 0.33, 0.27],
    }
}

/// Posterior damage-state probabilities after the counted inspections.
///
/// Works in log space so long inspection histories don't underflow.
pub fn posterior(prior: PriorConfidence, counts: &InspectionCounts) -> [f64; 3] {
    let priors = prior_probabilities(prior);
    let mut log_weights = priors.map(f64::ln);

    for class in DataConfidence::ALL {
        let n = f64::from(counts.count(class));
        if n == 0.0 {
            continue;
        }
        let conditional = conditional_probabilities(class);
        for (weight, p) in log_weights.iter_mut().zip(conditional) {
            *weight += n * p.ln();
        }
    }

    let max = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights = log_weights.map(|w| (w - max).exp());
    let total: f64 = weights.iter().sum();
    weights.map(|w| w / total)
}

/// Strength ratio from the resolved minimum thickness.
pub fn strength_ratio(min_thickness_mm: f64, reading_thickness_mm: f64) -> f64 {
    STRESS_TO_FLOW_RATIO * min_thickness_mm.max(MIN_STRUCTURAL_THICKNESS_MM) / reading_thickness_mm
}

/// Reliability index for one damage state.
pub fn reliability_index(damage_state: f64, art: f64, strength_ratio: f64) -> f64 {
    let loss = damage_state * art;
    let numerator = 1.0 - loss - strength_ratio;
    let variance = (loss * COV_THICKNESS).powi(2)
        + ((1.0 - loss) * COV_FLOW_STRESS).powi(2)
        + (strength_ratio * COV_PRESSURE).powi(2);
    numerator / variance.sqrt()
}

/// Damage factor from the wall-loss fraction `art`, the strength ratio and
/// the posterior state probabilities.
pub fn wall_loss_damage_factor(art: f64, strength_ratio: f64, posterior: &[f64; 3]) -> f64 {
    let failure_probability: f64 = DAMAGE_STATES
        .iter()
        .zip(posterior)
        .map(|(ds, p)| p * normal_cdf(-reliability_index(*ds, art, strength_ratio)))
        .sum();
    failure_probability / REFERENCE_FAILURE_PROBABILITY
}

/// Standard normal cumulative distribution.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function, Chebyshev fit with fractional error below
/// 1.2e-7 everywhere.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}
