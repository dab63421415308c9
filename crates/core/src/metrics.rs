//! Summary figures for the patient table and the dashboard cards.

use crate::constants::{ACTIVE_WINDOW_DAYS, RECENT_VISIT_DAYS, TABLE_ACTIVE_WINDOW_DAYS};
use crate::patient::PatientRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// Figures shown above the patient table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientTableSummary {
    pub total_patients: usize,
    /// Patients with a visit in the last 365 days.
    pub active_patients: usize,
    pub avg_hemoglobin: Option<f64>,
    pub avg_glucose: Option<f64>,
}

/// Figures shown on the dashboard cards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_patients: usize,
    /// Patients with a visit in the last 180 days.
    pub active_patients: usize,
    /// Patients with a visit in the last 30 days.
    pub recent_visits: usize,
    pub critical_alerts: usize,
    pub avg_age: Option<u32>,
    pub diabetes_patients: usize,
    pub diabetes_percentage: f64,
    pub hypertension_patients: usize,
    pub hypertension_percentage: f64,
    pub guardrail_violations: usize,
    pub healthy_patients: usize,
}

pub fn table_summary(records: &[PatientRecord], today: NaiveDate) -> PatientTableSummary {
    PatientTableSummary {
        total_patients: records.len(),
        active_patients: records
            .iter()
            .filter(|r| r.visited_within(today, TABLE_ACTIVE_WINDOW_DAYS))
            .count(),
        avg_hemoglobin: mean(records.iter().filter_map(|r| r.hemoglobin)),
        avg_glucose: mean(records.iter().filter_map(|r| r.glucose)),
    }
}

/// Compute the dashboard cards as of `today`.
///
/// A patient counts as a critical alert when glucose is above 200 mg/dL, hemoglobin is below
/// 12 g/dL or the guardrail flag is set. "Healthy" is the total minus the diabetes and
/// hypertension counts, floored at zero; a patient with both conditions is subtracted twice.
pub fn dashboard_metrics(records: &[PatientRecord], today: NaiveDate) -> DashboardMetrics {
    let total = records.len();
    let diabetes = count_where(records, |r| r.has_condition("diabetes"));
    let hypertension = count_where(records, |r| r.has_condition("hypertension"));

    DashboardMetrics {
        total_patients: total,
        active_patients: count_where(records, |r| r.visited_within(today, ACTIVE_WINDOW_DAYS)),
        recent_visits: count_where(records, |r| r.visited_within(today, RECENT_VISIT_DAYS)),
        critical_alerts: count_where(records, |r| r.is_critical() || r.guardrail_violation_flag),
        avg_age: mean(records.iter().filter_map(|r| r.age_on(today)).map(f64::from))
            .map(|age| age.round() as u32),
        diabetes_patients: diabetes,
        diabetes_percentage: percentage(diabetes, total),
        hypertension_patients: hypertension,
        hypertension_percentage: percentage(hypertension, total),
        guardrail_violations: count_where(records, |r| r.guardrail_violation_flag),
        healthy_patients: total.saturating_sub(diabetes + hypertension),
    }
}

pub(crate) fn count_where<F>(records: &[PatientRecord], pred: F) -> usize
where
    F: Fn(&PatientRecord) -> bool,
{
    records.iter().filter(|&r| pred(r)).count()
}

pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PatientDataset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_dashboard_metrics_on_sample_set() {
        let dataset = PatientDataset::sample();
        let metrics = dashboard_metrics(dataset.records(), date(2024, 2, 1));

        assert_eq!(metrics.total_patients, 5);
        assert_eq!(metrics.active_patients, 5);
        assert_eq!(metrics.recent_visits, 5);
        // Only the two guardrail flags; no lab value is critical in the sample.
        assert_eq!(metrics.critical_alerts, 2);
        assert_eq!(metrics.guardrail_violations, 2);
        assert_eq!(metrics.diabetes_patients, 1);
        assert_eq!(metrics.hypertension_patients, 1);
        assert_eq!(metrics.healthy_patients, 3);
        assert!((metrics.diabetes_percentage - 20.0).abs() < f64::EPSILON);
        // Ages on 2024-02-01: 44, 31, 57, 28, 66.
        assert_eq!(metrics.avg_age, Some(45));
    }

    #[test]
    fn test_visit_windows_shrink_over_time() {
        let dataset = PatientDataset::sample();
        let metrics = dashboard_metrics(dataset.records(), date(2024, 7, 1));

        assert_eq!(metrics.recent_visits, 0);
        assert_eq!(metrics.active_patients, 5);

        let metrics = dashboard_metrics(dataset.records(), date(2024, 8, 1));
        assert_eq!(metrics.active_patients, 0);
    }

    #[test]
    fn test_empty_dataset_yields_zeroes() {
        let metrics = dashboard_metrics(&[], date(2024, 2, 1));

        assert_eq!(metrics.total_patients, 0);
        assert_eq!(metrics.avg_age, None);
        assert_eq!(metrics.diabetes_percentage, 0.0);
        assert_eq!(metrics.healthy_patients, 0);
    }

    #[test]
    fn test_table_summary_averages() {
        let dataset = PatientDataset::sample();
        let summary = table_summary(dataset.records(), date(2025, 1, 10));

        assert_eq!(summary.total_patients, 5);
        assert_eq!(summary.active_patients, 5);
        let avg_glucose = summary.avg_glucose.expect("glucose present");
        assert!((avg_glucose - 100.0).abs() < 1e-9);
        let avg_hemoglobin = summary.avg_hemoglobin.expect("hemoglobin present");
        assert!((avg_hemoglobin - 14.3).abs() < 1e-9);
    }
}
