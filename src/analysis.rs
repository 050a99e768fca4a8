//! Deterministic analysis layer for recovery readings
//!
//! This module computes the per-patient baseline, metric trends, and the
//! deviation-based risk score. All functions here are pure: they never fail,
//! never touch I/O, and degrade to conservative defaults when history is too
//! short for a stable read.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{BaselineProfile, Patient, RecoveryEntry};
use crate::policy::RiskPolicy;

/// Entries ending at or before this hour form the baseline-collection window
pub const BASELINE_WINDOW_END_HOUR: f64 = 6.0;

/// History shorter than this is a "low window": not enough points for a
/// stable trend read, so the final score is softened
const LOW_WINDOW_HISTORY: usize = 3;
const LOW_WINDOW_LENIENCY: f64 = 0.85;

// Physiological plausibility ranges. Values outside these are treated as
// sensor or input error and contribute zero deviation instead of being
// rejected.
const HEART_RATE_VALID: std::ops::RangeInclusive<f64> = 30.0..=220.0;
const SPO2_VALID: std::ops::RangeInclusive<f64> = 80.0..=100.0;
const TEMPERATURE_VALID: std::ops::RangeInclusive<f64> = 34.0..=41.0;
const PAIN_VALID: std::ops::RangeInclusive<f64> = 0.0..=10.0;

// Hard-alert limits: absolute breaches independent of baseline
const HARD_ALERT_SPO2_BELOW: f64 = 90.0;
const HARD_ALERT_TEMP_ABOVE: f64 = 38.8;
const HARD_ALERT_HR_ABOVE: f64 = 130.0;
const HARD_ALERT_HR_BELOW: f64 = 45.0;
const HARD_ALERT_BONUS: f64 = 15.0;

// Vitals dominate the composite
const VITALS_SHARE: f64 = 0.65;
const FUNCTION_SHARE: f64 = 0.35;

// Scores never report perfectly safe nor absolute maximum
const SCORE_FLOOR: f64 = 5.0;
const SCORE_CEILING: f64 = 95.0;

/// ---------------------------------------------------------------------------
/// Baseline Calculator
/// ---------------------------------------------------------------------------

/// Reduce the baseline-window entries (`end_hour <= 6`) into per-metric means.
///
/// Falls back to the policy's default profile when no baseline entries exist,
/// so scoring always has a non-zero divisor to work against.
pub fn compute_baseline(entries: &[RecoveryEntry], policy: &RiskPolicy) -> BaselineProfile {
  let baseline_entries: Vec<&RecoveryEntry> = entries
    .iter()
    .filter(|e| e.end_hour <= BASELINE_WINDOW_END_HOUR)
    .collect();

  if baseline_entries.is_empty() {
    return policy.default_baseline.clone();
  }

  let mean = |value: fn(&RecoveryEntry) -> f64| -> f64 {
    baseline_entries.iter().map(|e| value(e)).sum::<f64>() / baseline_entries.len() as f64
  };

  BaselineProfile {
    heart_rate: mean(|e| e.heart_rate),
    spo2: mean(|e| e.spo2),
    temperature: mean(|e| e.temperature),
    activity: mean(|e| e.activity()),
    pain: mean(|e| e.pain_score),
    sleep_hours: mean(|e| e.sleep_hours),
  }
}

/// ---------------------------------------------------------------------------
/// Trend Estimator
/// ---------------------------------------------------------------------------

/// A scored metric selectable for trend estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
  HeartRate,
  Spo2,
  Temperature,
  Pain,
}

impl Metric {
  pub fn value_of(&self, entry: &RecoveryEntry) -> f64 {
    match self {
      Self::HeartRate => entry.heart_rate,
      Self::Spo2 => entry.spo2,
      Self::Temperature => entry.temperature,
      Self::Pain => entry.pain_score,
    }
  }
}

/// Signed relative delta of the most recent value against the mean of the
/// two before it.
///
/// Returns 0 (neutral) with fewer than 3 finite values; a zero previous
/// average divides by 1 instead. The result is a fraction, not a percentage:
/// callers compare it against small epsilons like 0.02.
pub fn metric_trend(history: &[RecoveryEntry], metric: Metric) -> f64 {
  let values: Vec<f64> = history
    .iter()
    .map(|e| metric.value_of(e))
    .filter(|v| v.is_finite())
    .collect();

  if values.len() < 3 {
    return 0.0;
  }

  let recent = values[values.len() - 1];
  let prev_avg = (values[values.len() - 2] + values[values.len() - 3]) / 2.0;
  let divisor = if prev_avg == 0.0 { 1.0 } else { prev_avg };

  (recent - prev_avg) / divisor
}

/// ---------------------------------------------------------------------------
/// Post-Op Day Context
/// ---------------------------------------------------------------------------

/// Day-dependent tolerance and expectation schedule.
///
/// Only `activity_factor` feeds the current scoring rules; the tolerance and
/// minimum fields are computed and exposed for callers and future rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostOpContext {
  pub hr_tolerance: f64,
  pub spo2_tolerance: f64,
  pub temp_tolerance: f64,
  /// Fraction of baseline activity expected for this day
  pub activity_factor: f64,
  pub min_sleep_hours: f64,
  pub min_minutes_moved: f64,
}

impl PostOpContext {
  /// Early days tolerate wider vital swings and expect less movement
  pub fn for_day(post_op_day: i64) -> Self {
    let early = post_op_day <= 2;
    Self {
      hr_tolerance: if early {
        0.22
      } else if post_op_day <= 5 {
        0.18
      } else {
        0.15
      },
      spo2_tolerance: if early { 0.06 } else { 0.05 },
      temp_tolerance: if early { 0.03 } else { 0.02 },
      activity_factor: if early {
        0.35
      } else if post_op_day <= 5 {
        0.5
      } else {
        0.65
      },
      min_sleep_hours: if early { 5.5 } else { 6.5 },
      min_minutes_moved: if early { 10.0 } else { 15.0 },
    }
  }
}

/// ---------------------------------------------------------------------------
/// Risk Scorer
/// ---------------------------------------------------------------------------

/// Every intermediate the scorer produced on the way to the final score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
  /// Final risk score, clamped to [5, 95]
  pub score: i64,
  pub context: PostOpContext,
  pub low_window: bool,

  // Deviation magnitudes in percent (0 when the input was invalid)
  pub hr_deviation: f64,
  pub spo2_deviation: f64,
  pub temp_deviation: f64,
  pub activity_deviation: f64,
  pub pain_deviation: f64,

  // Composite parts and modifiers
  pub vitals_score: f64,
  pub function_score: f64,
  pub symptom_multiplier: f64,
  pub trend_penalty: f64,
  pub hard_alert: bool,
}

/// Score a single entry against the baseline, returning the full breakdown.
///
/// `history` holds the entries up to and including the current one, ascending
/// by timestamp; pass an empty slice when only the entry itself is known.
pub fn assess_risk(
  entry: &RecoveryEntry,
  baseline: &BaselineProfile,
  patient: &Patient,
  history: &[RecoveryEntry],
  policy: &RiskPolicy,
) -> RiskBreakdown {
  let weights = policy.weights.for_surgery(patient.surgery_type);

  let low_window = history.len() < LOW_WINDOW_HISTORY;
  let leniency = if low_window { LOW_WINDOW_LENIENCY } else { 1.0 };

  let post_op_day = if entry.post_op_day == 0 { 1 } else { entry.post_op_day };
  let context = PostOpContext::for_day(post_op_day);

  let invalid_hr = !HEART_RATE_VALID.contains(&entry.heart_rate);
  let invalid_spo2 = !SPO2_VALID.contains(&entry.spo2);
  let invalid_temp = !TEMPERATURE_VALID.contains(&entry.temperature);
  let invalid_pain = !PAIN_VALID.contains(&entry.pain_score);

  // Deviation magnitudes, directionally constrained per metric: SpO2 only
  // counts drops, activity only shortfall, pain only increase.
  let hr_deviation = if invalid_hr {
    0.0
  } else {
    ((entry.heart_rate - baseline.heart_rate) / baseline.heart_rate * 100.0).abs()
  };

  let spo2_deviation = if invalid_spo2 {
    0.0
  } else {
    ((baseline.spo2 - entry.spo2) / baseline.spo2 * 100.0).max(0.0)
  };

  let temp_deviation = if invalid_temp {
    0.0
  } else {
    ((entry.temperature - baseline.temperature) / baseline.temperature * 100.0).abs()
  };

  let expected_activity = baseline.activity * context.activity_factor;
  let activity_deviation =
    ((expected_activity - entry.activity()) / expected_activity.max(1.0) * 100.0).max(0.0);

  let pain_deviation = if invalid_pain {
    0.0
  } else if baseline.pain > 0.0 {
    ((entry.pain_score - baseline.pain) / baseline.pain * 100.0).max(0.0)
  } else if entry.pain_score > 0.0 {
    // Zero pain baseline: fall back to an absolute scale
    entry.pain_score * 10.0
  } else {
    0.0
  };

  let hard_alert = (!invalid_spo2 && entry.spo2 < HARD_ALERT_SPO2_BELOW)
    || (!invalid_temp && entry.temperature > HARD_ALERT_TEMP_ABOVE)
    || (!invalid_hr
      && (entry.heart_rate > HARD_ALERT_HR_ABOVE || entry.heart_rate < HARD_ALERT_HR_BELOW));

  // Fixed point bonuses when a trend crosses its threshold
  let trend_penalty = (if metric_trend(history, Metric::Temperature) > 0.02 { 3.0 } else { 0.0 })
    + (if metric_trend(history, Metric::Spo2) < -0.02 { 3.0 } else { 0.0 })
    + (if metric_trend(history, Metric::HeartRate) > 0.05 { 2.0 } else { 0.0 })
    + (if metric_trend(history, Metric::Pain) > 0.1 { 2.0 } else { 0.0 });

  let vitals_score = hr_deviation * weights.heart_rate
    + spo2_deviation * weights.spo2
    + temp_deviation * weights.temperature;

  let function_score = activity_deviation * weights.activity + pain_deviation * weights.pain;

  let symptom_multiplier = policy.symptom_multipliers.total_for(&entry.tags);

  let mut score = vitals_score * VITALS_SHARE + function_score * FUNCTION_SHARE;
  score *= 1.0 + symptom_multiplier;
  score += if low_window { trend_penalty * 0.5 } else { trend_penalty };
  if hard_alert {
    score += HARD_ALERT_BONUS;
  }
  score *= leniency;

  let score = score.clamp(SCORE_FLOOR, SCORE_CEILING).round() as i64;

  debug!(score, hard_alert, low_window, "risk score computed");

  RiskBreakdown {
    score,
    context,
    low_window,
    hr_deviation,
    spo2_deviation,
    temp_deviation,
    activity_deviation,
    pain_deviation,
    vitals_score,
    function_score,
    symptom_multiplier,
    trend_penalty,
    hard_alert,
  }
}

/// The risk score alone, for callers that do not need the breakdown
pub fn compute_risk_score(
  entry: &RecoveryEntry,
  baseline: &BaselineProfile,
  patient: &Patient,
  history: &[RecoveryEntry],
  policy: &RiskPolicy,
) -> i64 {
  assess_risk(entry, baseline, patient, history, policy).score
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
