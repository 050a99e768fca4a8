//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories
//! - Helper assertions

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Patient, RecoveryEntry, SurgeryType, SymptomTags, Trend, WindowSummary};

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Fixed surgery reference time so tests are deterministic
pub fn reference_time() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

pub fn mock_patient(surgery_type: SurgeryType) -> Patient {
  Patient {
    id: "patient-1".to_string(),
    surgery_type,
  }
}

/// An entry sitting exactly on the stock default baseline: HR 75, SpO2 98,
/// 36.8 degrees, activity 1530, pain 3, sleep 7.5, day 1, no symptoms.
///
/// With the default policy this scores the clamp floor; tests perturb single
/// fields from here.
pub fn entry_at(start_hour: f64, end_hour: f64) -> RecoveryEntry {
  RecoveryEntry {
    id: None,
    timestamp: reference_time() + Duration::hours(start_hour as i64),
    post_op_day: 1,
    start_hour,
    end_hour,
    heart_rate: 75.0,
    spo2: 98.0,
    temperature: 36.8,
    steps: 1071.0,
    minutes_moved: 459.0,
    sleep_hours: 7.5,
    pain_score: 3.0,
    tags: SymptomTags::default(),
  }
}

/// A post-baseline entry with the given vitals and everything else at
/// baseline
pub fn entry_with_vitals(heart_rate: f64, spo2: f64, temperature: f64) -> RecoveryEntry {
  let mut entry = entry_at(7.0, 7.0);
  entry.heart_rate = heart_rate;
  entry.spo2 = spo2;
  entry.temperature = temperature;
  entry
}

/// A window summary with the given score and quiet aggregates
pub fn mock_summary(label: &str, risk_score: i64) -> WindowSummary {
  WindowSummary {
    window_label: label.to_string(),
    start_time: reference_time(),
    end_time: reference_time() + Duration::hours(6),
    avg_heart_rate: 75,
    avg_spo2: 98,
    avg_temperature: 36.8,
    avg_pain_score: 3.0,
    total_activity: 1530.0,
    total_sleep: 7.5,
    risk_score,
    trend: Trend::Plateau,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let patient = mock_patient(SurgeryType::Neuro);
    assert_eq!(patient.surgery_type, SurgeryType::Neuro);

    let entry = entry_at(7.0, 7.0);
    assert_eq!(entry.activity(), 1530.0);
    assert!(!entry.tags.any());

    let summary = mock_summary("W3", 42);
    assert_eq!(summary.window_label, "W3");
    assert_eq!(summary.risk_score, 42);
  }

  #[test]
  fn test_entry_with_vitals_only_changes_vitals() {
    let entry = entry_with_vitals(90.0, 95.0, 37.5);
    assert_eq!(entry.heart_rate, 90.0);
    assert_eq!(entry.spo2, 95.0);
    assert_eq!(entry.temperature, 37.5);
    assert_eq!(entry.pain_score, 3.0);
    assert_eq!(entry.activity(), 1530.0);
  }
}
