//! Rule-based alert classification over the latest recovery window
//!
//! A small ordered rule list turns the newest window's risk score and the
//! triggering entry's symptom flags into one alert decision. First match
//! wins; the classifier always returns exactly one decision and never fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{RecoveryEntry, Trend, WindowSummary};
use crate::policy::{RiskPolicy, RiskThresholds};

/// ---------------------------------------------------------------------------
/// Recovery Status
/// ---------------------------------------------------------------------------

/// Presentation status derived from the risk score and the two shared
/// thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStatus {
  Stable,
  Monitor,
  Critical,
}

impl RecoveryStatus {
  pub fn from_risk_score(score: i64, thresholds: &RiskThresholds) -> Self {
    if score > thresholds.critical {
      Self::Critical
    } else if score > thresholds.moderate {
      Self::Monitor
    } else {
      Self::Stable
    }
  }
}

impl std::fmt::Display for RecoveryStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Stable => write!(f, "Stable"),
      Self::Monitor => write!(f, "Monitor"),
      Self::Critical => write!(f, "Critical"),
    }
  }
}

/// Recovery Stability Index: the inverse presentation of the risk score
pub fn rsi(risk_score: i64) -> i64 {
  100 - risk_score
}

/// ---------------------------------------------------------------------------
/// Alert Classifier
/// ---------------------------------------------------------------------------

/// The classifier's verdict: whether to alert, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDecision {
  pub alert: bool,
  pub reason: String,
}

impl AlertDecision {
  fn new(alert: bool, reason: impl Into<String>) -> Self {
    Self {
      alert,
      reason: reason.into(),
    }
  }
}

/// Evaluate the four-tier rule list against the latest window summary.
///
/// Rule order matters: a critical score outranks trend, trend outranks the
/// symptom check, and a moderate score without symptoms is deliberately
/// suppressed to avoid alert fatigue.
pub fn classify_alert(
  latest_summary: &WindowSummary,
  current_entry: &RecoveryEntry,
  policy: &RiskPolicy,
) -> AlertDecision {
  let thresholds = &policy.thresholds;

  let decision = if latest_summary.risk_score > thresholds.critical {
    AlertDecision::new(
      true,
      format!("Critical Risk Score: {}", latest_summary.risk_score),
    )
  } else if latest_summary.trend == Trend::Worsening {
    AlertDecision::new(true, "Worsening Trend Detected")
  } else if latest_summary.risk_score > thresholds.moderate && current_entry.tags.any() {
    AlertDecision::new(true, "Elevated Risk with Symptoms")
  } else if latest_summary.risk_score > thresholds.moderate {
    AlertDecision::new(false, "Risk elevated but stable; monitoring.")
  } else {
    AlertDecision::new(false, "Patient stable.")
  };

  debug!(
    alert = decision.alert,
    reason = %decision.reason,
    window = %latest_summary.window_label,
    "alert classified"
  );

  decision
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::SymptomTags;
  use crate::test_utils::{entry_at, mock_summary};

  fn summary_with(score: i64, trend: Trend) -> WindowSummary {
    let mut summary = mock_summary("W2", score);
    summary.trend = trend;
    summary
  }

  #[test]
  fn test_critical_score_outranks_improving_trend() {
    let policy = RiskPolicy::default();
    let summary = summary_with(70, Trend::Improving);
    let entry = entry_at(13.0, 13.0);

    let decision = classify_alert(&summary, &entry, &policy);
    assert!(decision.alert);
    assert_eq!(decision.reason, "Critical Risk Score: 70");
  }

  #[test]
  fn test_worsening_trend_alerts_below_critical() {
    let policy = RiskPolicy::default();
    let summary = summary_with(30, Trend::Worsening);
    let entry = entry_at(13.0, 13.0);

    let decision = classify_alert(&summary, &entry, &policy);
    assert!(decision.alert);
    assert_eq!(decision.reason, "Worsening Trend Detected");
  }

  #[test]
  fn test_moderate_risk_with_symptoms_alerts() {
    let policy = RiskPolicy::default();
    let summary = summary_with(45, Trend::Plateau);
    let mut entry = entry_at(13.0, 13.0);
    entry.tags = SymptomTags {
      nauseous: false,
      dizzy: true,
      vomiting: false,
    };

    let decision = classify_alert(&summary, &entry, &policy);
    assert!(decision.alert);
    assert_eq!(decision.reason, "Elevated Risk with Symptoms");
  }

  #[test]
  fn test_moderate_risk_without_symptoms_is_suppressed() {
    let policy = RiskPolicy::default();
    let summary = summary_with(45, Trend::Plateau);
    let entry = entry_at(13.0, 13.0);

    let decision = classify_alert(&summary, &entry, &policy);
    assert!(!decision.alert);
    assert_eq!(decision.reason, "Risk elevated but stable; monitoring.");
  }

  #[test]
  fn test_quiet_summary_reads_stable() {
    let policy = RiskPolicy::default();
    let summary = summary_with(12, Trend::Plateau);
    let entry = entry_at(13.0, 13.0);

    let decision = classify_alert(&summary, &entry, &policy);
    assert!(!decision.alert);
    assert_eq!(decision.reason, "Patient stable.");
  }

  #[test]
  fn test_thresholds_are_exclusive_bounds() {
    let policy = RiskPolicy::default();
    let entry = entry_at(13.0, 13.0);

    // Exactly 60 is not critical; exactly 40 is not moderate
    let decision = classify_alert(&summary_with(60, Trend::Plateau), &entry, &policy);
    assert_eq!(decision.reason, "Risk elevated but stable; monitoring.");

    let decision = classify_alert(&summary_with(40, Trend::Plateau), &entry, &policy);
    assert_eq!(decision.reason, "Patient stable.");
  }

  #[test]
  fn test_status_thresholds() {
    let thresholds = RiskThresholds::default();
    assert_eq!(
      RecoveryStatus::from_risk_score(40, &thresholds),
      RecoveryStatus::Stable
    );
    assert_eq!(
      RecoveryStatus::from_risk_score(41, &thresholds),
      RecoveryStatus::Monitor
    );
    assert_eq!(
      RecoveryStatus::from_risk_score(60, &thresholds),
      RecoveryStatus::Monitor
    );
    assert_eq!(
      RecoveryStatus::from_risk_score(61, &thresholds),
      RecoveryStatus::Critical
    );
  }

  #[test]
  fn test_rsi_is_inverse_of_risk() {
    assert_eq!(rsi(5), 95);
    assert_eq!(rsi(95), 5);
    assert_eq!(rsi(40), 60);
  }
}
