//! Terminal tables for the CLI commands.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use medinext_core::{
    format_display_date, ActivityFeed, Appointment, CountEntry, DashboardMetrics, Page,
    PatientAnalytics, PatientRecord, Prescription,
};

fn header_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn number_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn patient_page(page: &Page<PatientRecord>) -> String {
    let mut table = header_table(&[
        "ID",
        "Name",
        "Gender",
        "Birth Date",
        "Last Visit",
        "Conditions",
        "Glucose",
        "Hemoglobin",
    ]);
    for r in &page.items {
        table.add_row(vec![
            r.patient_id.clone(),
            r.name.clone(),
            r.sex.clone(),
            format_display_date(r.birth_date),
            format_display_date(r.last_visit),
            list_or_none(&r.conditions),
            number_or_na(r.glucose),
            number_or_na(r.hemoglobin),
        ]);
    }

    format!(
        "{table}\nPage {} of {} ({} records)",
        page.page, page.total_pages, page.total_records
    )
}

pub fn patient_detail(record: &PatientRecord, age: Option<u32>) -> String {
    let mut table = header_table(&["Field", "Value"]);
    let age = age.map(|a| a.to_string()).unwrap_or_else(|| "N/A".into());
    let rows: Vec<(&str, String)> = vec![
        ("Patient ID", record.patient_id.clone()),
        ("Name", record.name.clone()),
        ("Gender", record.sex.clone()),
        ("Birth Date", format_display_date(record.birth_date)),
        ("Age", age),
        ("Address", record.address.clone()),
        ("Phone", record.phone_number.clone()),
        ("Last Visit", format_display_date(record.last_visit)),
        ("Conditions", list_or_none(&record.conditions)),
        ("Medications", list_or_none(&record.medications)),
        ("Glucose (mg/dL)", number_or_na(record.glucose)),
        ("Hemoglobin (g/dL)", number_or_na(record.hemoglobin)),
        (
            "Guardrail Flag",
            if record.guardrail_violation_flag { "Yes" } else { "No" }.to_string(),
        ),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table.to_string()
}

pub fn metrics(m: &DashboardMetrics) -> String {
    let mut table = header_table(&["Metric", "Value"]);
    let avg_age = m
        .avg_age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".into());
    table.add_row(vec!["Total Patients".to_string(), m.total_patients.to_string()]);
    table.add_row(vec![
        "Active (180 days)".to_string(),
        m.active_patients.to_string(),
    ]);
    table.add_row(vec![
        "Recent Visits (30 days)".to_string(),
        m.recent_visits.to_string(),
    ]);
    table.add_row(vec!["Critical Alerts".to_string(), m.critical_alerts.to_string()]);
    table.add_row(vec!["Average Age".to_string(), avg_age]);
    table.add_row(vec![
        "Diabetes".to_string(),
        format!("{} ({:.1}%)", m.diabetes_patients, m.diabetes_percentage),
    ]);
    table.add_row(vec![
        "Hypertension".to_string(),
        format!("{} ({:.1}%)", m.hypertension_patients, m.hypertension_percentage),
    ]);
    table.add_row(vec![
        "Guardrail Violations".to_string(),
        m.guardrail_violations.to_string(),
    ]);
    table.add_row(vec!["Healthy".to_string(), m.healthy_patients.to_string()]);
    table.to_string()
}

fn counts_table(title: &str, entries: &[CountEntry]) -> String {
    let mut table = header_table(&[title, "Count"]);
    for e in entries {
        table.add_row(vec![e.label.clone(), e.count.to_string()]);
    }
    table.to_string()
}

pub fn analytics(a: &PatientAnalytics) -> String {
    let avg_age = a
        .avg_age
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".into());
    let sections = [
        counts_table("Condition", &a.condition_counts),
        counts_table("Age Group", &a.age_distribution),
        counts_table("Gender", &a.gender_distribution),
        counts_table("Visit Month", &a.visits_by_month),
        counts_table("Glucose", &a.glucose_distribution),
        counts_table("Hemoglobin", &a.hemoglobin_distribution),
    ];
    format!(
        "Patients: {}  Average Age: {}  Average Glucose: {} mg/dL  Average Hemoglobin: {} g/dL\n\
         High glucose: {}  Low hemoglobin: {}  Guardrail violations: {}\n\n{}",
        a.total_patients,
        avg_age,
        number_or_na(a.avg_glucose),
        number_or_na(a.avg_hemoglobin),
        a.risks.high_glucose,
        a.risks.low_hemoglobin,
        a.risks.guardrail_violations,
        sections.join("\n\n")
    )
}

pub fn activity(feed: &ActivityFeed) -> String {
    if feed.activities.is_empty() {
        return "No recent patient activities to display".to_string();
    }
    let mut table = header_table(&["When", "Activity", "Type", "Priority"]);
    for a in &feed.activities {
        table.add_row(vec![
            a.time.clone(),
            a.activity.clone(),
            a.kind.as_str().to_string(),
            a.priority.as_str().to_string(),
        ]);
    }
    format!(
        "{table}\n{} activities ({} critical, {} normal)",
        feed.total, feed.critical, feed.normal
    )
}

pub fn appointments(items: &[Appointment]) -> String {
    let mut table = header_table(&["Time", "Patient", "Type", "Status"]);
    for a in items {
        table.add_row(vec![
            a.time.to_string(),
            a.patient.to_string(),
            a.kind.to_string(),
            a.status.to_string(),
        ]);
    }
    table.to_string()
}

pub fn prescriptions(items: &[Prescription]) -> String {
    let mut table = header_table(&["Patient", "Medication", "Dosage", "Status"]);
    for p in items {
        table.add_row(vec![
            p.patient.to_string(),
            p.medication.to_string(),
            p.dosage.to_string(),
            p.status.to_string(),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use medinext_core::PatientDataset;

    #[test]
    fn test_patient_page_shows_display_dates_and_footer() {
        let dataset = PatientDataset::sample();
        let page = medinext_core::search::paginate(dataset.records(), 1, 10).expect("page");

        let out = patient_page(&page);

        assert!(out.contains("15-May-1979"));
        assert!(out.contains("Page 1 of 1 (5 records)"));
    }

    #[test]
    fn test_patient_detail_marks_missing_values() {
        let mut record = PatientDataset::sample().records()[3].clone();
        record.glucose = None;

        let out = patient_detail(&record, None);

        assert!(out.contains("N/A"));
        assert!(out.contains("None"));
        assert!(out.contains("Sarah D Wilson"));
    }

    #[test]
    fn test_empty_activity_feed_message() {
        let dataset = PatientDataset::sample();
        let now = NaiveDate::from_ymd_opt(2030, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid time");
        let feed = medinext_core::activity::activity_feed(dataset.records(), now);

        assert_eq!(activity(&feed), "No recent patient activities to display");
    }

    #[test]
    fn test_prescriptions_table_uses_display_status() {
        let out = prescriptions(&medinext_core::schedule::current_prescriptions());
        assert!(out.contains("Refill Needed"));
    }
}
