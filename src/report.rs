//! One-call analysis pipeline: baseline -> risk score -> windows -> alert
//!
//! Mirrors what a submission handler needs after persisting a new reading:
//! everything derived from the history plus the fresh entry, packaged for
//! display and write-back.

use serde::{Deserialize, Serialize};

use crate::alerts::{classify_alert, rsi, AlertDecision, RecoveryStatus};
use crate::analysis::{assess_risk, compute_baseline, RiskBreakdown};
use crate::models::{BaselineProfile, Patient, RecoveryEntry, WindowSummary};
use crate::policy::RiskPolicy;
use crate::windows::compute_window_summaries;

/// The complete engine output for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryReport {
  pub risk_score: i64,
  /// Recovery Stability Index, `100 - risk_score`
  pub rsi: i64,
  pub status: RecoveryStatus,
  pub alert: bool,
  pub explanation: String,
  pub breakdown: RiskBreakdown,
  pub baseline: BaselineProfile,
  pub summaries: Vec<WindowSummary>,
}

impl RecoveryReport {
  /// Run the four-step pipeline over the stored history plus the current
  /// entry.
  ///
  /// `history` is the persisted entries ascending by timestamp, without the
  /// current one; the baseline and windows see history plus current.
  pub fn build(
    history: &[RecoveryEntry],
    current: &RecoveryEntry,
    patient: &Patient,
    policy: &RiskPolicy,
  ) -> Self {
    let mut all_entries: Vec<RecoveryEntry> = history.to_vec();
    all_entries.push(current.clone());

    let baseline = compute_baseline(&all_entries, policy);
    let breakdown = assess_risk(current, &baseline, patient, &[], policy);
    let summaries = compute_window_summaries(&all_entries, &baseline, patient, policy);

    // Before any post-baseline window exists there is nothing to classify.
    let decision = match summaries.last() {
      Some(latest) => classify_alert(latest, current, policy),
      None => AlertDecision {
        alert: false,
        reason: "Patient stable.".to_string(),
      },
    };

    let risk_score = breakdown.score;

    Self {
      risk_score,
      rsi: rsi(risk_score),
      status: RecoveryStatus::from_risk_score(risk_score, &policy.thresholds),
      alert: decision.alert,
      explanation: decision.reason,
      breakdown,
      baseline,
      summaries,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
