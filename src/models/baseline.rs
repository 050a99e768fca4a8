use serde::{Deserialize, Serialize};

/// Per-patient reference profile: mean values over the baseline window.
///
/// Recomputed from history on every scoring request, never persisted on its
/// own. Always present: when no baseline entries exist the fixed defaults
/// stand in, so deviation math never divides by an undefined baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineProfile {
  pub heart_rate: f64,
  pub spo2: f64,
  pub temperature: f64,
  /// Steps + minutes moved, summed per entry before averaging
  pub activity: f64,
  pub pain: f64,
  pub sleep_hours: f64,
}

impl Default for BaselineProfile {
  fn default() -> Self {
    Self {
      heart_rate: 75.0,
      spo2: 98.0,
      temperature: 36.8,
      activity: 1530.0,
      pain: 3.0,
      sleep_hours: 7.5,
    }
  }
}
