use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Symptom Tags
/// ---------------------------------------------------------------------------

/// Enumerated symptom flags derived from free-text symptom labels.
///
/// This is the single normalization step shared by the scorer and by callers
/// mapping persisted rows or fresh submissions into entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomTags {
  pub nauseous: bool,
  pub dizzy: bool,
  pub vomiting: bool,
}

impl SymptomTags {
  /// Derive tags from free-text labels by case-insensitive substring match.
  ///
  /// "Nausea", "nauseous" and friends all set the same flag; unrecognized
  /// labels are ignored.
  pub fn from_labels<I, S>(labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut tags = Self::default();
    for label in labels {
      let label = label.as_ref().to_lowercase();
      if label.contains("nause") {
        tags.nauseous = true;
      }
      if label.contains("dizzy") {
        tags.dizzy = true;
      }
      if label.contains("vomit") {
        tags.vomiting = true;
      }
    }
    tags
  }

  /// True if any symptom flag is set
  pub fn any(&self) -> bool {
    self.nauseous || self.dizzy || self.vomiting
  }
}

/// ---------------------------------------------------------------------------
/// Recovery Entry
/// ---------------------------------------------------------------------------

/// One logged observation: vitals, activity, pain, and symptom tags.
///
/// Hour offsets are relative to the surgery/registration reference time;
/// entries with `end_hour <= 6` belong to the baseline-collection window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryEntry {
  pub id: Option<String>,
  pub timestamp: DateTime<Utc>,
  pub post_op_day: i64,
  pub start_hour: f64,
  pub end_hour: f64,

  // Vitals
  pub heart_rate: f64,
  pub spo2: f64,
  pub temperature: f64,

  // Function
  pub steps: f64,
  pub minutes_moved: f64,
  pub sleep_hours: f64,

  // Symptoms
  pub pain_score: f64,
  pub tags: SymptomTags,
}

impl RecoveryEntry {
  /// Steps plus minutes moved, the combined activity measure used throughout
  /// baseline and deviation math
  pub fn activity(&self) -> f64 {
    self.steps + self.minutes_moved
  }
}

/// ---------------------------------------------------------------------------
/// Raw Reading (pre-normalization submission or persisted row)
/// ---------------------------------------------------------------------------

/// A reading as it arrives from storage or a fresh submission, before
/// numeric coercion and symptom normalization.
///
/// Missing vitals get unit-specific fallbacks (SpO2 98, temperature 37);
/// everything else defaults to zero. Legacy rows with null vitals therefore
/// score as sensor gaps rather than emergencies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReading {
  pub id: Option<String>,
  pub heart_rate: Option<f64>,
  pub spo2: Option<f64>,
  pub temperature: Option<f64>,
  pub steps: Option<f64>,
  pub minutes_moved: Option<f64>,
  pub sleep_hours: Option<f64>,
  pub pain: Option<f64>,
  pub symptoms: Vec<String>,
}

impl RawReading {
  /// Build a normalized entry, deriving hour/day offsets from the surgery
  /// reference time.
  ///
  /// Offsets use ceiling division so a reading 30 minutes in counts as
  /// hour 1 of day 1; readings before the reference clamp to hour 0.
  pub fn into_entry(self, surgery_date: DateTime<Utc>, recorded_at: DateTime<Utc>) -> RecoveryEntry {
    let elapsed_ms = (recorded_at - surgery_date).num_milliseconds();
    let hours_since = ((elapsed_ms as f64 / 3_600_000.0).ceil()).max(0.0);
    let days_since = (elapsed_ms as f64 / 86_400_000.0).ceil() as i64;

    RecoveryEntry {
      id: self.id,
      timestamp: recorded_at,
      post_op_day: days_since,
      start_hour: hours_since,
      end_hour: hours_since,
      heart_rate: self.heart_rate.unwrap_or(0.0),
      spo2: self.spo2.unwrap_or(98.0),
      temperature: self.temperature.unwrap_or(37.0),
      steps: self.steps.unwrap_or(0.0),
      minutes_moved: self.minutes_moved.unwrap_or(0.0),
      sleep_hours: self.sleep_hours.unwrap_or(0.0),
      pain_score: self.pain.unwrap_or(0.0),
      tags: SymptomTags::from_labels(&self.symptoms),
    }
  }
}
