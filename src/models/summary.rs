use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk trajectory of a recovery window relative to its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum Trend {
  Improving,
  Worsening,
  #[default]
  Plateau,
}

impl std::fmt::Display for Trend {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Improving => write!(f, "Improving"),
      Self::Worsening => write!(f, "Worsening"),
      Self::Plateau => write!(f, "Plateau"),
    }
  }
}

/// Aggregates and risk analysis for one fixed 6-hour recovery window.
///
/// Summaries are rebuilt from scratch on every history fetch or submission;
/// a recomputation always yields a fresh ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSummary {
  /// e.g. "W2" for the second post-baseline window
  pub window_label: String,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,

  // Aggregates
  pub avg_heart_rate: i64,
  pub avg_spo2: i64,
  pub avg_temperature: f64,
  pub avg_pain_score: f64,
  pub total_activity: f64,
  pub total_sleep: f64,

  // Analysis
  pub risk_score: i64,
  pub trend: Trend,
}
