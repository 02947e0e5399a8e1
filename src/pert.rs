//! PERT statistics over the critical path.
//!
//! Activity durations are treated as independent Beta-distributed variables,
//! so the project variance is the sum of the critical activities' variances
//! and completion estimates come from the normal approximation.

use crate::activity::Activity;
use crate::cpm::ProjectSchedule;
use crate::error::PertError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Two-sided 95% multiplier used for the confidence interval.
pub const Z_95_TWO_SIDED: f64 = 1.96;

// Abramowitz & Stegun 26.2.22, |error| < 3e-3
const A0: f64 = 2.30753;
const A1: f64 = 0.27061;
const B1: f64 = 0.99229;
const B2: f64 = 0.04481;

/// Standard-normal quantile for a percentage in (0, 100).
///
/// With `q = min(p, 1 - p)` and `t = sqrt(-2 ln q)`:
/// `x = t - (a0 + a1 t) / (1 + b1 t + b2 t^2)`, negated when `p < 0.5`.
///
/// # Errors
/// `PertError::InvalidProbability` for values outside the open interval,
/// including NaN; nothing is clamped.
pub fn z_score(confidence_level: f64) -> Result<f64, PertError> {
    if !(confidence_level > 0.0 && confidence_level < 100.0) {
        return Err(PertError::InvalidProbability(confidence_level));
    }
    let p = confidence_level / 100.0;
    let q = if p < 0.5 { p } else { 1.0 - p };
    let t = (-2.0 * q.ln()).sqrt();
    let x = t - (A0 + A1 * t) / (1.0 + B1 * t + B2 * t * t);
    Ok(if p < 0.5 { -x } else { x })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityEstimate {
    pub confidence_level: f64,
    pub estimated_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityVariance {
    pub id: i32,
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PertStatistics {
    pub project_duration: i64,
    pub total_variance: f64,
    pub standard_deviation: f64,
    /// Variance of each critical activity, in critical-path order.
    pub critical_variances: Vec<ActivityVariance>,
    pub probability_table: Vec<ProbabilityEstimate>,
    /// Smallest optimistic and largest pessimistic estimate on the critical path.
    pub duration_range: Option<(f64, f64)>,
    /// Half-width of the two-sided 95% interval around the project duration.
    pub confidence_interval_95: f64,
}

impl PertStatistics {
    pub fn estimate_for(&self, confidence_level: f64) -> Option<f64> {
        self.probability_table
            .iter()
            .find(|entry| entry.confidence_level == confidence_level)
            .map(|entry| entry.estimated_duration)
    }
}

/// Derives PERT statistics from a computed schedule.
///
/// `activities` must be the set the schedule was computed from; only the
/// critical ones contribute to the variance.
pub fn compute_pert_statistics(
    activities: &[Activity],
    schedule: &ProjectSchedule,
    confidence_levels: &[f64],
) -> Result<PertStatistics, PertError> {
    let by_id: HashMap<i32, &Activity> = activities.iter().map(|a| (a.id, a)).collect();
    let critical: Vec<&Activity> = schedule
        .critical_path
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .collect();

    let critical_variances: Vec<ActivityVariance> = critical
        .iter()
        .map(|activity| ActivityVariance {
            id: activity.id,
            variance: activity.variance(),
        })
        .collect();
    let total_variance: f64 = critical_variances.iter().map(|v| v.variance).sum();
    let standard_deviation = total_variance.sqrt();

    let mut probability_table = Vec::with_capacity(confidence_levels.len());
    for &level in confidence_levels {
        let z = z_score(level)?;
        probability_table.push(ProbabilityEstimate {
            confidence_level: level,
            estimated_duration: schedule.project_duration as f64 + z * standard_deviation,
        });
    }

    let duration_range = if critical.is_empty() {
        None
    } else {
        let min = critical
            .iter()
            .map(|a| a.optimistic)
            .fold(f64::INFINITY, f64::min);
        let max = critical
            .iter()
            .map(|a| a.pessimistic)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    };

    Ok(PertStatistics {
        project_duration: schedule.project_duration,
        total_variance,
        standard_deviation,
        critical_variances,
        probability_table,
        duration_range,
        confidence_interval_95: Z_95_TWO_SIDED * standard_deviation,
    })
}
