use serde::{Deserialize, Serialize};

/// Surgery type, used only to select the metric weight vector for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum SurgeryType {
  HeartSurgery,
  Maternity,
  Neuro,
  /// Fallback for absent or unrecognized surgery labels
  #[default]
  General,
}

impl SurgeryType {
  /// Map a free-text surgery label to a known type.
  ///
  /// Unknown or empty labels fall back to `General`, mirroring how patient
  /// records with missing surgery information are scored.
  pub fn from_label(label: &str) -> Self {
    match label.trim().to_lowercase().as_str() {
      "heart surgery" | "heart_surgery" | "heart" => Self::HeartSurgery,
      "maternity" => Self::Maternity,
      "neuro" => Self::Neuro,
      _ => Self::General,
    }
  }
}

impl std::fmt::Display for SurgeryType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::HeartSurgery => write!(f, "Heart Surgery"),
      Self::Maternity => write!(f, "Maternity"),
      Self::Neuro => write!(f, "Neuro"),
      Self::General => write!(f, "General"),
    }
  }
}

/// A patient under post-operative monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
  pub id: String,
  pub surgery_type: SurgeryType,
}
