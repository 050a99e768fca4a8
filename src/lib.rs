//! Post-operative recovery risk engine
//!
//! A pure, deterministic scoring engine over a patient's recovery entries:
//! - personalized baseline derivation with fixed-default fallback
//! - deviation-based risk scoring weighted by surgery type
//! - 6-hour window aggregation with trend labels
//! - a four-tier alert rule set
//!
//! The engine performs no I/O and holds no state of its own: callers supply
//! the stored history plus the current entry and consume scores, summaries,
//! and alert decisions. All tunables (weights, multipliers, thresholds,
//! baseline defaults) are injected through [`policy::RiskPolicy`].

pub mod alerts;
pub mod analysis;
pub mod models;
pub mod policy;
pub mod report;
pub mod windows;

#[cfg(test)]
pub mod test_utils;

pub use alerts::{classify_alert, rsi, AlertDecision, RecoveryStatus};
pub use analysis::{
  assess_risk, compute_baseline, compute_risk_score, metric_trend, Metric, PostOpContext,
  RiskBreakdown,
};
pub use models::{
  BaselineProfile, Patient, RawReading, RecoveryEntry, SurgeryType, SymptomTags, Trend,
  WindowSummary,
};
pub use policy::{PolicyError, RiskPolicy};
pub use report::RecoveryReport;
pub use windows::compute_window_summaries;
