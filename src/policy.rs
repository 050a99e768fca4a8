//! Scoring policy: the configurable tables the risk engine depends on
//!
//! Weight vectors, symptom multipliers, alert thresholds, and the default
//! baseline are injected into the engine as one `RiskPolicy` value instead of
//! being hardcoded, so deployments (and tests) can swap policy tables without
//! touching scoring logic. A partial JSON policy file merges over the stock
//! defaults field by field.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{BaselineProfile, SurgeryType, SymptomTags};

/// Environment variable naming an optional JSON policy file
pub const POLICY_PATH_VAR: &str = "RECOVERY_POLICY_PATH";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
  #[error("Failed to read policy file: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to parse policy JSON: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("Invalid policy: {0}")]
  Invalid(String),
}

/// ---------------------------------------------------------------------------
/// Weight Tables
/// ---------------------------------------------------------------------------

/// Per-metric deviation weights for one surgery type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
  pub heart_rate: f64,
  pub spo2: f64,
  pub temperature: f64,
  pub activity: f64,
  pub pain: f64,
}

impl Default for MetricWeights {
  /// The General vector, also the fallback for unrecognized surgery types
  fn default() -> Self {
    Self {
      heart_rate: 1.0,
      spo2: 1.5,
      temperature: 1.0,
      activity: 1.0,
      pain: 1.0,
    }
  }
}

/// Weight vectors keyed by surgery type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgeryWeights {
  pub heart_surgery: MetricWeights,
  pub maternity: MetricWeights,
  pub neuro: MetricWeights,
  pub general: MetricWeights,
}

impl Default for SurgeryWeights {
  fn default() -> Self {
    Self {
      heart_surgery: MetricWeights {
        heart_rate: 2.0,
        spo2: 2.5,
        temperature: 1.5,
        activity: 1.0,
        pain: 1.0,
      },
      maternity: MetricWeights {
        heart_rate: 1.0,
        spo2: 1.0,
        temperature: 1.5,
        activity: 1.0,
        pain: 2.0,
      },
      neuro: MetricWeights {
        heart_rate: 1.5,
        spo2: 1.5,
        temperature: 1.0,
        activity: 2.0,
        pain: 1.5,
      },
      general: MetricWeights::default(),
    }
  }
}

impl SurgeryWeights {
  pub fn for_surgery(&self, surgery: SurgeryType) -> &MetricWeights {
    match surgery {
      SurgeryType::HeartSurgery => &self.heart_surgery,
      SurgeryType::Maternity => &self.maternity,
      SurgeryType::Neuro => &self.neuro,
      SurgeryType::General => &self.general,
    }
  }

  fn iter(&self) -> [(&'static str, &MetricWeights); 4] {
    [
      ("heart_surgery", &self.heart_surgery),
      ("maternity", &self.maternity),
      ("neuro", &self.neuro),
      ("general", &self.general),
    ]
  }
}

/// ---------------------------------------------------------------------------
/// Symptom Multipliers
/// ---------------------------------------------------------------------------

/// Additive risk multipliers per symptom tag; the scorer applies the sum as
/// `score * (1 + total)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomMultipliers {
  pub nauseous: f64,
  pub dizzy: f64,
  pub vomiting: f64,
}

impl Default for SymptomMultipliers {
  fn default() -> Self {
    Self {
      nauseous: 0.2,
      dizzy: 0.3,
      vomiting: 0.5,
    }
  }
}

impl SymptomMultipliers {
  /// Sum of multipliers for the set flags
  pub fn total_for(&self, tags: &SymptomTags) -> f64 {
    let mut total = 0.0;
    if tags.nauseous {
      total += self.nauseous;
    }
    if tags.dizzy {
      total += self.dizzy;
    }
    if tags.vomiting {
      total += self.vomiting;
    }
    total
  }
}

/// ---------------------------------------------------------------------------
/// Risk Thresholds
/// ---------------------------------------------------------------------------

/// The two score thresholds shared by the alert rules and status derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
  pub moderate: i64,
  pub critical: i64,
}

impl Default for RiskThresholds {
  fn default() -> Self {
    Self {
      moderate: 40,
      critical: 60,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Risk Policy
/// ---------------------------------------------------------------------------

/// The complete policy bundle injected into every engine entry point
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
  pub weights: SurgeryWeights,
  pub symptom_multipliers: SymptomMultipliers,
  pub thresholds: RiskThresholds,
  pub default_baseline: BaselineProfile,
}

impl RiskPolicy {
  /// Parse and validate a policy from JSON. Omitted fields keep their
  /// default values.
  pub fn from_json(json: &str) -> Result<Self, PolicyError> {
    let policy: Self = serde_json::from_str(json)?;
    policy.validate()?;
    Ok(policy)
  }

  /// Read and validate a policy file
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json(&json)
  }

  /// Load the policy for this process: the file named by
  /// `RECOVERY_POLICY_PATH` if set (a local `.env` is honored), otherwise
  /// the stock defaults.
  pub fn load() -> Result<Self, PolicyError> {
    dotenvy::dotenv().ok();
    match std::env::var(POLICY_PATH_VAR) {
      Ok(path) => Self::from_file(path),
      Err(_) => Ok(Self::default()),
    }
  }

  /// Reject tables the scorer cannot safely divide or compare against
  pub fn validate(&self) -> Result<(), PolicyError> {
    for (name, weights) in self.weights.iter() {
      let values = [
        weights.heart_rate,
        weights.spo2,
        weights.temperature,
        weights.activity,
        weights.pain,
      ];
      if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(PolicyError::Invalid(format!(
          "weight vector '{}' contains a negative or non-finite value",
          name
        )));
      }
    }

    if self.thresholds.moderate >= self.thresholds.critical {
      return Err(PolicyError::Invalid(format!(
        "moderate threshold ({}) must be below critical ({})",
        self.thresholds.moderate, self.thresholds.critical
      )));
    }

    let baseline = &self.default_baseline;
    let positive = [
      baseline.heart_rate,
      baseline.spo2,
      baseline.temperature,
      baseline.activity,
      baseline.sleep_hours,
    ];
    if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
      return Err(PolicyError::Invalid(
        "default baseline vitals must be positive".to_string(),
      ));
    }
    // Pain baseline of zero is legal; the scorer has a dedicated fallback.
    if !baseline.pain.is_finite() || baseline.pain < 0.0 {
      return Err(PolicyError::Invalid(
        "default baseline pain must be non-negative".to_string(),
      ));
    }

    Ok(())
  }
}
