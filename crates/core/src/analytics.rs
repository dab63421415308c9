//! Distributions and averages behind the analytics charts.

use crate::constants::{
    AGE_BINS, ELEVATED_GLUCOSE_MG_DL, GLUCOSE_BINS, HEMOGLOBIN_BINS, TOP_CONDITIONS,
    VISIT_HISTORY_DAYS,
};
use crate::metrics::{count_where, mean};
use crate::patient::PatientRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One bar of a chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

impl CountEntry {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthRisks {
    /// Glucose above 126 mg/dL.
    pub high_glucose: usize,
    /// Hemoglobin below 12 g/dL.
    pub low_hemoglobin: usize,
    pub guardrail_violations: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientAnalytics {
    pub total_patients: usize,
    /// Most frequent conditions, at most ten.
    pub condition_counts: Vec<CountEntry>,
    /// Every age bin in order, including empty ones.
    pub age_distribution: Vec<CountEntry>,
    pub gender_distribution: Vec<CountEntry>,
    /// Visits per `YYYY-MM` over the last 365 days, oldest first.
    pub visits_by_month: Vec<CountEntry>,
    pub glucose_distribution: Vec<CountEntry>,
    pub hemoglobin_distribution: Vec<CountEntry>,
    pub avg_age: Option<u32>,
    pub avg_glucose: Option<f64>,
    pub avg_hemoglobin: Option<f64>,
    pub risks: HealthRisks,
}

/// Compute analytics as of `today`. Returns `None` for an empty dataset.
pub fn patient_analytics(records: &[PatientRecord], today: NaiveDate) -> Option<PatientAnalytics> {
    if records.is_empty() {
        return None;
    }

    let ages: Vec<f64> = records
        .iter()
        .filter_map(|r| r.age_on(today))
        .map(f64::from)
        .collect();

    Some(PatientAnalytics {
        total_patients: records.len(),
        condition_counts: condition_counts(records),
        age_distribution: binned(ages.iter().copied(), AGE_BINS),
        gender_distribution: ranked_counts(
            records
                .iter()
                .map(|r| r.sex.as_str())
                .filter(|s| !s.is_empty()),
        ),
        visits_by_month: visits_by_month(records, today),
        glucose_distribution: binned(records.iter().filter_map(|r| r.glucose), GLUCOSE_BINS),
        hemoglobin_distribution: binned(
            records.iter().filter_map(|r| r.hemoglobin),
            HEMOGLOBIN_BINS,
        ),
        avg_age: mean(ages.iter().copied()).map(|age| age.round() as u32),
        avg_glucose: mean(records.iter().filter_map(|r| r.glucose)),
        avg_hemoglobin: mean(records.iter().filter_map(|r| r.hemoglobin)),
        risks: HealthRisks {
            high_glucose: count_where(records, |r| {
                r.glucose.is_some_and(|g| g > ELEVATED_GLUCOSE_MG_DL)
            }),
            low_hemoglobin: count_where(records, PatientRecord::has_low_hemoglobin),
            guardrail_violations: count_where(records, |r| r.guardrail_violation_flag),
        },
    })
}

fn condition_counts(records: &[PatientRecord]) -> Vec<CountEntry> {
    let mut entries = ranked_counts(
        records
            .iter()
            .flat_map(|r| r.conditions.iter().map(String::as_str)),
    );
    entries.truncate(TOP_CONDITIONS);
    entries
}

/// Count occurrences, most frequent first; ties are ordered by label.
fn ranked_counts<'a, I>(values: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry::new(label, count))
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

/// Count values into half-open `[lower, upper)` bins. Values outside every bin are dropped.
fn binned<I>(values: I, bins: &[(f64, f64, &str)]) -> Vec<CountEntry>
where
    I: IntoIterator<Item = f64>,
{
    let mut counts = vec![0usize; bins.len()];
    for value in values {
        if let Some(i) = bins
            .iter()
            .position(|(lower, upper, _)| value >= *lower && value < *upper)
        {
            counts[i] += 1;
        }
    }

    bins.iter()
        .zip(counts)
        .map(|((_, _, label), count)| CountEntry::new(*label, count))
        .collect()
}

fn visits_by_month(records: &[PatientRecord], today: NaiveDate) -> Vec<CountEntry> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(visit) = record
            .last_visit
            .filter(|_| record.visited_within(today, VISIT_HISTORY_DAYS))
        {
            *months.entry(visit.format("%Y-%m").to_string()).or_default() += 1;
        }
    }

    months
        .into_iter()
        .map(|(month, count)| CountEntry::new(month, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PatientDataset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn labels(entries: &[CountEntry]) -> Vec<(&str, usize)> {
        entries
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect()
    }

    #[test]
    fn test_empty_dataset_has_no_analytics() {
        assert!(patient_analytics(&[], date(2024, 2, 1)).is_none());
    }

    #[test]
    fn test_sample_distributions() {
        let dataset = PatientDataset::sample();
        let analytics =
            patient_analytics(dataset.records(), date(2024, 2, 1)).expect("analytics present");

        // Ages 44, 31, 57, 28, 66.
        assert_eq!(
            labels(&analytics.age_distribution),
            vec![
                ("0-18", 0),
                ("19-30", 1),
                ("31-45", 2),
                ("46-60", 1),
                ("61-75", 1),
                ("75+", 0)
            ]
        );
        assert_eq!(
            labels(&analytics.gender_distribution),
            vec![("M", 3), ("F", 2)]
        );
        assert_eq!(labels(&analytics.visits_by_month), vec![("2024-01", 5)]);
        // Glucose 95, 120, 88, 92, 105.
        assert_eq!(
            labels(&analytics.glucose_distribution),
            vec![
                ("Low", 0),
                ("Normal", 3),
                ("Pre-diabetes", 2),
                ("Diabetes", 0),
                ("High", 0)
            ]
        );
        assert_eq!(analytics.hemoglobin_distribution[2].count, 5);
        assert_eq!(analytics.condition_counts.len(), 4);
        assert_eq!(analytics.avg_age, Some(45));
        assert_eq!(
            analytics.risks,
            HealthRisks {
                high_glucose: 0,
                low_hemoglobin: 0,
                guardrail_violations: 2
            }
        );
    }

    #[test]
    fn test_condition_counts_rank_and_truncate() {
        let mut dataset = PatientDataset::sample().records().to_vec();
        for (i, record) in dataset.iter_mut().enumerate() {
            record.conditions = (0..=i)
                .map(|j| format!("Condition {j}"))
                .chain(["Shared A".to_string(), "Shared B".to_string()])
                .chain((0..3).map(|k| format!("Unique {i}-{k}")))
                .collect();
        }

        let counts = condition_counts(&dataset);

        assert_eq!(counts.len(), TOP_CONDITIONS);
        assert_eq!(counts[0], CountEntry::new("Condition 0", 5));
        assert_eq!(counts[1], CountEntry::new("Shared A", 5));
        assert_eq!(counts[2], CountEntry::new("Shared B", 5));
        assert_eq!(counts[3], CountEntry::new("Condition 1", 4));
    }

    #[test]
    fn test_bins_are_half_open() {
        let entries = binned([0.0, 69.9, 70.0, 126.0, 300.0], GLUCOSE_BINS);
        assert_eq!(
            labels(&entries),
            vec![
                ("Low", 2),
                ("Normal", 1),
                ("Pre-diabetes", 0),
                ("Diabetes", 1),
                ("High", 0)
            ]
        );
    }

    #[test]
    fn test_visits_older_than_a_year_are_excluded() {
        let dataset = PatientDataset::sample();
        let analytics =
            patient_analytics(dataset.records(), date(2025, 1, 20)).expect("analytics present");

        // Visits on or after 2024-01-21 only.
        assert_eq!(labels(&analytics.visits_by_month), vec![("2024-01", 1)]);
    }
}
