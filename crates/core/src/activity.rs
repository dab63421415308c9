//! Recent activity feed derived from patient visits and lab values.

use crate::constants::{
    ACTIVITY_FEED_LIMIT, CRITICAL_GLUCOSE_MG_DL, ELEVATED_GLUCOSE_MG_DL, LOW_HEMOGLOBIN_G_DL,
    RECENT_VISIT_DAYS,
};
use crate::patient::PatientRecord;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Alert,
    Questionnaire,
    Appointment,
    LabResult,
    Prescription,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Alert => "alert",
            ActivityKind::Questionnaire => "questionnaire",
            ActivityKind::Appointment => "appointment",
            ActivityKind::LabResult => "lab_result",
            ActivityKind::Prescription => "prescription",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Normal => "normal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activity {
    /// Relative label such as `5 hours ago` or `3 days ago`.
    pub time: String,
    pub activity: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub priority: Priority,
    #[serde(skip)]
    hours_ago: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityFeed {
    pub activities: Vec<Activity>,
    pub total: usize,
    pub critical: usize,
    pub normal: usize,
}

/// Format elapsed hours as `N hours ago` below a day and `N days ago` otherwise.
pub fn time_ago_label(hours_ago: i64) -> String {
    if hours_ago < 24 {
        format!("{hours_ago} hours ago")
    } else {
        format!("{} days ago", hours_ago / 24)
    }
}

/// Build the feed as of `now`.
///
/// Draws on the first ten patients (dataset order) whose last visit is within 30 days. Each
/// patient contributes alerts for critical glucose, low hemoglobin and a guardrail flag, and
/// routine entries for diabetes, hypertension, elevated glucose and listed medications. The
/// result is most recent first and holds at most ten entries.
pub fn activity_feed(records: &[PatientRecord], now: NaiveDateTime) -> ActivityFeed {
    let cutoff = now - Duration::days(RECENT_VISIT_DAYS);
    let mut activities: Vec<Activity> = records
        .iter()
        .filter_map(|record| {
            let visit = record.last_visit?.and_hms_opt(0, 0, 0)?;
            (visit >= cutoff).then_some((record, visit))
        })
        .take(ACTIVITY_FEED_LIMIT)
        .flat_map(|(record, visit)| patient_activities(record, (now - visit).num_hours().max(0)))
        .collect();

    activities.sort_by_key(|a| a.hours_ago);
    activities.truncate(ACTIVITY_FEED_LIMIT);

    let critical = activities
        .iter()
        .filter(|a| a.priority == Priority::Critical)
        .count();

    ActivityFeed {
        total: activities.len(),
        critical,
        normal: activities.len() - critical,
        activities,
    }
}

fn patient_activities(record: &PatientRecord, hours_ago: i64) -> Vec<Activity> {
    let time = time_ago_label(hours_ago);
    let name = &record.name;
    let entry = |activity: String, kind: ActivityKind, priority: Priority| Activity {
        time: time.clone(),
        activity,
        kind,
        priority,
        hours_ago,
    };

    let mut out = Vec::new();

    if let Some(glucose) = record.glucose.filter(|g| *g > CRITICAL_GLUCOSE_MG_DL) {
        out.push(entry(
            format!("Critical: High glucose level ({glucose:.1} mg/dL) detected for {name}"),
            ActivityKind::Alert,
            Priority::Critical,
        ));
    }
    if let Some(hemoglobin) = record.hemoglobin.filter(|h| *h < LOW_HEMOGLOBIN_G_DL) {
        out.push(entry(
            format!("Alert: Low hemoglobin ({hemoglobin:.1} g/dL) for {name}"),
            ActivityKind::Alert,
            Priority::Critical,
        ));
    }
    if record.guardrail_violation_flag {
        out.push(entry(
            format!("Guardrail violation detected for {name}"),
            ActivityKind::Alert,
            Priority::Critical,
        ));
    }
    if record.has_condition("diabetes") {
        out.push(entry(
            format!("Diabetes management review completed for {name}"),
            ActivityKind::Questionnaire,
            Priority::Normal,
        ));
    }
    if record.has_condition("hypertension") {
        out.push(entry(
            format!("Blood pressure monitoring scheduled for {name}"),
            ActivityKind::Appointment,
            Priority::Normal,
        ));
    }
    if record.glucose.is_some_and(|g| g > ELEVATED_GLUCOSE_MG_DL) {
        out.push(entry(
            format!("Lab results: Elevated glucose levels for {name}"),
            ActivityKind::LabResult,
            Priority::Normal,
        ));
    }
    if !record.medications.is_empty() {
        out.push(entry(
            format!("Prescription review completed for {name}"),
            ActivityKind::Prescription,
            Priority::Normal,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PatientDataset;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn test_time_ago_label() {
        assert_eq!(time_ago_label(0), "0 hours ago");
        assert_eq!(time_ago_label(23), "23 hours ago");
        assert_eq!(time_ago_label(24), "1 days ago");
        assert_eq!(time_ago_label(71), "2 days ago");
    }

    #[test]
    fn test_feed_from_sample_is_sorted_and_limited() {
        let dataset = PatientDataset::sample();
        let feed = activity_feed(dataset.records(), at(2024, 1, 22, 6));

        // P004 (today) has no entries; P002 (2 days ago) is the most recent with any.
        assert_eq!(feed.activities[0].time, "2 days ago");
        assert!(feed.activities[0].activity.contains("Jane B Smith"));
        assert!(feed
            .activities
            .windows(2)
            .all(|w| w[0].hours_ago <= w[1].hours_ago));
        assert_eq!(feed.total, feed.activities.len());
        assert_eq!(feed.critical + feed.normal, feed.total);
        // Guardrail flags on P002 and P005.
        assert_eq!(feed.critical, 2);
        assert!(feed.total <= ACTIVITY_FEED_LIMIT);
    }

    #[test]
    fn test_critical_lab_values_raise_alerts() {
        let mut record = PatientDataset::sample().records()[3].clone();
        record.glucose = Some(250.0);
        record.hemoglobin = Some(10.5);

        let feed = activity_feed(&[record], at(2024, 1, 22, 5));

        let texts: Vec<&str> = feed
            .activities
            .iter()
            .map(|a| a.activity.as_str())
            .collect();
        assert_eq!(feed.critical, 2);
        assert!(texts.contains(&"Critical: High glucose level (250.0 mg/dL) detected for Sarah D Wilson"));
        assert!(texts.contains(&"Alert: Low hemoglobin (10.5 g/dL) for Sarah D Wilson"));
        assert!(texts.contains(&"Lab results: Elevated glucose levels for Sarah D Wilson"));
        assert!(feed.activities.iter().all(|a| a.time == "5 hours ago"));
    }

    #[test]
    fn test_old_visits_produce_empty_feed() {
        let dataset = PatientDataset::sample();
        let feed = activity_feed(dataset.records(), at(2024, 6, 1, 0));

        assert!(feed.activities.is_empty());
        assert_eq!(feed.total, 0);
    }

    #[test]
    fn test_activity_serializes_kind_as_type() {
        let activity = Activity {
            time: "1 days ago".into(),
            activity: "x".into(),
            kind: ActivityKind::LabResult,
            priority: Priority::Normal,
            hours_ago: 30,
        };
        let json = serde_json::to_value(&activity).expect("serialize activity");

        assert_eq!(json["type"], "lab_result");
        assert_eq!(json["priority"], "normal");
        assert!(json.get("hours_ago").is_none());
    }
}
