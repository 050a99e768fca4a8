//! Window Aggregator: fixed 6-hour recovery windows over post-baseline entries
//!
//! Entries past the baseline window are bucketed by `ceil(start_hour / 6)`,
//! averaged, and re-scored through the risk engine using only the history
//! visible at that window's end. Summaries come out in numeric window order,
//! then each gets a trend label relative to its predecessor.

use std::collections::BTreeMap;

use crate::analysis::{compute_risk_score, BASELINE_WINDOW_END_HOUR};
use crate::models::{BaselineProfile, Patient, RecoveryEntry, Trend, WindowSummary};
use crate::policy::RiskPolicy;

/// Width of one recovery window, counted from the surgery reference time
pub const WINDOW_HOURS: f64 = 6.0;

/// A first window scoring above this starts life as Worsening
const FIRST_WINDOW_WORSENING_ABOVE: i64 = 20;

/// Score movement inside this margin reads as Plateau
const TREND_MARGIN: i64 = 5;

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// Group post-baseline entries into 6-hour windows and score each one.
///
/// Later windows never see data from earlier than their own end hour; the
/// scorer's history is truncated causally per bucket.
pub fn compute_window_summaries(
  entries: &[RecoveryEntry],
  baseline: &BaselineProfile,
  patient: &Patient,
  policy: &RiskPolicy,
) -> Vec<WindowSummary> {
  let mut active: Vec<RecoveryEntry> = entries
    .iter()
    .filter(|e| e.end_hour > BASELINE_WINDOW_END_HOUR)
    .cloned()
    .collect();
  active.sort_by(|a, b| {
    a.start_hour
      .partial_cmp(&b.start_hour)
      .unwrap_or(std::cmp::Ordering::Equal)
  });

  // BTreeMap keys keep the windows in numeric index order regardless of
  // entry arrival order.
  let mut buckets: BTreeMap<i64, Vec<&RecoveryEntry>> = BTreeMap::new();
  for entry in &active {
    let index = (entry.start_hour / WINDOW_HOURS).ceil() as i64;
    buckets.entry(index).or_default().push(entry);
  }

  let mut summaries: Vec<WindowSummary> = Vec::with_capacity(buckets.len());

  for (index, bucket) in &buckets {
    let mean = |value: fn(&RecoveryEntry) -> f64| -> f64 {
      bucket.iter().map(|e| value(e)).sum::<f64>() / bucket.len() as f64
    };

    let first = bucket[0];
    let last = bucket[bucket.len() - 1];

    let avg_heart_rate = mean(|e| e.heart_rate).round() as i64;
    let avg_spo2 = mean(|e| e.spo2).round() as i64;
    let avg_temperature = round1(mean(|e| e.temperature));
    let avg_pain_score = round1(mean(|e| e.pain_score));
    let total_activity: f64 = bucket.iter().map(|e| e.activity()).sum();
    let total_sleep: f64 = bucket.iter().map(|e| e.sleep_hours).sum();

    // Synthetic representative entry for re-scoring: averaged vitals, mean
    // (not summed) activity and sleep, the latest entry's symptom tags.
    let representative = RecoveryEntry {
      id: None,
      timestamp: last.timestamp,
      post_op_day: first.post_op_day,
      start_hour: first.start_hour,
      end_hour: last.end_hour,
      heart_rate: avg_heart_rate as f64,
      spo2: avg_spo2 as f64,
      temperature: avg_temperature,
      steps: mean(|e| e.steps),
      minutes_moved: mean(|e| e.minutes_moved),
      sleep_hours: mean(|e| e.sleep_hours),
      pain_score: avg_pain_score,
      tags: last.tags,
    };

    let visible_history: Vec<RecoveryEntry> = active
      .iter()
      .filter(|e| e.end_hour <= last.end_hour)
      .cloned()
      .collect();

    let risk_score = compute_risk_score(&representative, baseline, patient, &visible_history, policy);

    summaries.push(WindowSummary {
      window_label: format!("W{}", index),
      start_time: first.timestamp,
      end_time: last.timestamp,
      avg_heart_rate,
      avg_spo2,
      avg_temperature,
      avg_pain_score,
      total_activity,
      total_sleep,
      risk_score,
      trend: Trend::Plateau,
    });
  }

  assign_trends(&mut summaries);
  summaries
}

/// Label each window's trajectory once all scores exist.
///
/// The first window has no predecessor: it starts Worsening only when its
/// score is already elevated. Later windows compare against the previous
/// score with a +/-5 margin; movement on the margin itself is Plateau.
fn assign_trends(summaries: &mut [WindowSummary]) {
  for i in 0..summaries.len() {
    summaries[i].trend = if i == 0 {
      if summaries[0].risk_score > FIRST_WINDOW_WORSENING_ABOVE {
        Trend::Worsening
      } else {
        Trend::Plateau
      }
    } else {
      let prev = summaries[i - 1].risk_score;
      let curr = summaries[i].risk_score;
      if curr > prev + TREND_MARGIN {
        Trend::Worsening
      } else if curr < prev - TREND_MARGIN {
        Trend::Improving
      } else {
        Trend::Plateau
      }
    };
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::SurgeryType;
  use crate::test_utils::{entry_at, mock_patient, mock_summary};

  #[test]
  fn test_bucket_boundaries() {
    let policy = RiskPolicy::default();
    let baseline = BaselineProfile::default();
    let patient = mock_patient(SurgeryType::General);

    // start 6 lands in W1 (ceil(6/6) = 1); start 7, 8, 11 all in W2
    let entries = vec![
      entry_at(6.0, 7.0),
      entry_at(7.0, 7.0),
      entry_at(8.0, 8.0),
      entry_at(11.0, 11.0),
    ];

    let summaries = compute_window_summaries(&entries, &baseline, &patient, &policy);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].window_label, "W1");
    assert_eq!(summaries[1].window_label, "W2");
  }

  #[test]
  fn test_baseline_window_entries_are_excluded() {
    let policy = RiskPolicy::default();
    let baseline = BaselineProfile::default();
    let patient = mock_patient(SurgeryType::General);

    let entries = vec![entry_at(2.0, 2.0), entry_at(5.0, 6.0), entry_at(9.0, 9.0)];
    let summaries = compute_window_summaries(&entries, &baseline, &patient, &policy);

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].window_label, "W2");
  }

  #[test]
  fn test_window_labels_sort_numerically_not_lexically() {
    let policy = RiskPolicy::default();
    let baseline = BaselineProfile::default();
    let patient = mock_patient(SurgeryType::General);

    // W13 would sort before W2 lexically
    let entries = vec![entry_at(75.0, 75.0), entry_at(7.0, 7.0)];
    let summaries = compute_window_summaries(&entries, &baseline, &patient, &policy);

    let labels: Vec<&str> = summaries.iter().map(|s| s.window_label.as_str()).collect();
    assert_eq!(labels, vec!["W2", "W13"]);
  }

  #[test]
  fn test_window_aggregates_and_rounding() {
    let policy = RiskPolicy::default();
    let baseline = BaselineProfile::default();
    let patient = mock_patient(SurgeryType::General);

    let mut a = entry_at(7.0, 7.0);
    a.heart_rate = 80.0;
    a.temperature = 37.0;
    a.steps = 500.0;
    a.minutes_moved = 50.0;
    a.sleep_hours = 2.0;
    let mut b = entry_at(8.0, 8.0);
    b.heart_rate = 85.0;
    b.temperature = 37.2;
    b.steps = 700.0;
    b.minutes_moved = 30.0;
    b.sleep_hours = 1.5;

    let summaries = compute_window_summaries(&[a, b], &baseline, &patient, &policy);
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    assert_eq!(summary.avg_heart_rate, 83); // 82.5 rounds away from zero
    assert_eq!(summary.avg_spo2, 98);
    assert_eq!(summary.avg_temperature, 37.1);
    assert_eq!(summary.avg_pain_score, 3.0);
    assert_eq!(summary.total_activity, 1280.0);
    assert_eq!(summary.total_sleep, 3.5);
  }

  #[test]
  fn test_later_entries_do_not_change_earlier_windows() {
    let policy = RiskPolicy::default();
    let baseline = BaselineProfile::default();
    let patient = mock_patient(SurgeryType::General);

    let calm = entry_at(7.0, 7.0);
    let mut spiking = entry_at(13.0, 13.0);
    spiking.heart_rate = 135.0;
    spiking.spo2 = 88.0;

    let with_later = compute_window_summaries(
      &[calm.clone(), spiking],
      &baseline,
      &patient,
      &policy,
    );
    let alone = compute_window_summaries(&[calm], &baseline, &patient, &policy);

    assert_eq!(with_later[0].risk_score, alone[0].risk_score);
    assert!(with_later[1].risk_score > with_later[0].risk_score);
  }

  #[test]
  fn test_trend_margin_boundaries() {
    // Scores [10, 20, 15]: quiet start, a >5 jump, then a drop exactly on
    // the margin which must stay Plateau.
    let mut summaries = vec![
      mock_summary("W1", 10),
      mock_summary("W2", 20),
      mock_summary("W3", 15),
    ];
    assign_trends(&mut summaries);

    assert_eq!(summaries[0].trend, Trend::Plateau);
    assert_eq!(summaries[1].trend, Trend::Worsening);
    assert_eq!(summaries[2].trend, Trend::Plateau);
  }

  #[test]
  fn test_first_window_worsening_when_elevated() {
    let mut summaries = vec![mock_summary("W1", 21)];
    assign_trends(&mut summaries);
    assert_eq!(summaries[0].trend, Trend::Worsening);

    let mut summaries = vec![mock_summary("W1", 20)];
    assign_trends(&mut summaries);
    assert_eq!(summaries[0].trend, Trend::Plateau);
  }

  #[test]
  fn test_clear_improvement_is_labeled() {
    let mut summaries = vec![mock_summary("W1", 40), mock_summary("W2", 30)];
    assign_trends(&mut summaries);
    assert_eq!(summaries[1].trend, Trend::Improving);
  }

  #[test]
  fn test_empty_input_yields_no_summaries() {
    let policy = RiskPolicy::default();
    let baseline = BaselineProfile::default();
    let patient = mock_patient(SurgeryType::General);

    let summaries = compute_window_summaries(&[], &baseline, &patient, &policy);
    assert!(summaries.is_empty());
  }
}
