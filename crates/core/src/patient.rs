//! Patient records as loaded from the dataset.
//!
//! A `PatientRecord` holds every column of the source file, identifiers included. Only
//! [`PatientRecord::clinical_excerpt`] produces data that may leave the process.

use crate::constants::{
    CRITICAL_GLUCOSE_MG_DL, DATETIME_FORMATS, DATE_FORMATS, EMPTY_LIST_MARKERS,
    LOW_HEMOGLOBIN_G_DL,
};
use crate::{DatasetError, DatasetResult};
use chrono::{NaiveDate, NaiveDateTime};
use medinext_insight::{age_on, PatientClinicalExcerpt};
use serde::Serialize;

/// One row of the dataset after coercion.
///
/// Unparseable dates and numbers become `None`. List columns are split on commas with
/// "None"/"nan"/blank treated as empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientRecord {
    pub patient_id: String,
    pub name: String,
    pub sex: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub last_visit: Option<NaiveDate>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub hemoglobin: Option<f64>,
    pub glucose: Option<f64>,
    pub ssn: String,
    pub phone_number: String,
    pub guardrail_violation_flag: bool,
}

impl PatientRecord {
    /// Build a record from raw cell text, looked up by column name.
    ///
    /// Columns absent from `cell` are treated as blank.
    pub fn from_cells<F>(cell: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let text = |column: &str| cell(column).trim().to_string();
        Self {
            patient_id: text("patient_id"),
            name: text("name"),
            sex: text("sex"),
            birth_date: parse_date(&cell("birth_date")),
            address: text("address"),
            last_visit: parse_date(&cell("last_visit")),
            conditions: parse_list(&cell("conditions")),
            medications: parse_list(&cell("medications")),
            hemoglobin: parse_number(&cell("hemoglobin")),
            glucose: parse_number(&cell("glucose")),
            ssn: text("ssn"),
            phone_number: text("phone_number"),
            guardrail_violation_flag: parse_flag(&cell("guardrail_violation_flag")),
        }
    }

    /// Age in whole years on `on`, if the birth date is known.
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|birth| age_on(birth, on))
    }

    /// Case-insensitive substring match against each listed condition.
    pub fn has_condition(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.conditions
            .iter()
            .any(|c| c.to_lowercase().contains(&needle))
    }

    pub fn has_critical_glucose(&self) -> bool {
        self.glucose.is_some_and(|g| g > CRITICAL_GLUCOSE_MG_DL)
    }

    pub fn has_low_hemoglobin(&self) -> bool {
        self.hemoglobin.is_some_and(|h| h < LOW_HEMOGLOBIN_G_DL)
    }

    /// Critical means glucose above 200 mg/dL or hemoglobin below 12 g/dL.
    pub fn is_critical(&self) -> bool {
        self.has_critical_glucose() || self.has_low_hemoglobin()
    }

    /// Whether the last visit falls within `days` before `today` (inclusive).
    pub fn visited_within(&self, today: NaiveDate, days: i64) -> bool {
        self.last_visit
            .is_some_and(|visit| visit >= today - chrono::Duration::days(days))
    }

    /// Build the identifier-free excerpt sent for AI analysis.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::IncompleteRecord` if hemoglobin or glucose is missing; the
    /// prompt requires both lab values.
    pub fn clinical_excerpt(&self, captured_on: NaiveDate) -> DatasetResult<PatientClinicalExcerpt> {
        let hemoglobin = self.hemoglobin.ok_or_else(|| DatasetError::IncompleteRecord {
            patient_id: self.patient_id.clone(),
            field: "hemoglobin",
        })?;
        let glucose = self.glucose.ok_or_else(|| DatasetError::IncompleteRecord {
            patient_id: self.patient_id.clone(),
            field: "glucose",
        })?;

        Ok(PatientClinicalExcerpt::new(
            self.birth_date,
            self.sex.clone(),
            self.conditions.clone(),
            hemoglobin,
            self.medications.clone(),
            glucose,
            captured_on,
        ))
    }
}

/// Parse a date in any of the accepted layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a finite number; anything else is treated as missing.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// "true"/"1"/"yes" in any case are set; everything else is unset.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "1.0"
    )
}

/// Split a comma-separated cell into trimmed entries.
pub fn parse_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || EMPTY_LIST_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample_record() -> PatientRecord {
        PatientRecord {
            patient_id: "P001".into(),
            name: "John Smith".into(),
            sex: "Male".into(),
            birth_date: Some(date(1979, 5, 15)),
            address: "123 Main St".into(),
            last_visit: Some(date(2024, 1, 15)),
            conditions: vec!["Hypertension".into(), "Diabetes".into()],
            medications: vec!["Lisinopril".into()],
            hemoglobin: Some(14.2),
            glucose: Some(95.0),
            ssn: "123-45-6789".into(),
            phone_number: "555-0101".into(),
            guardrail_violation_flag: false,
        }
    }

    #[test]
    fn test_parse_date_accepts_all_layouts() {
        let expected = Some(date(1979, 5, 15));
        assert_eq!(parse_date("15-May-1979"), expected);
        assert_eq!(parse_date("1979-05-15"), expected);
        assert_eq!(parse_date("05/15/1979"), expected);
        assert_eq!(parse_date("1979-05-15 08:30:00"), expected);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn test_parse_date_prefers_month_first_when_ambiguous() {
        assert_eq!(parse_date("03/04/2020"), Some(date(2020, 3, 4)));
        assert_eq!(parse_date("25/04/2020"), Some(date(2020, 4, 25)));
    }

    #[test]
    fn test_parse_list_treats_markers_as_empty() {
        assert!(parse_list("None").is_empty());
        assert!(parse_list("nan").is_empty());
        assert!(parse_list("").is_empty());
        assert_eq!(
            parse_list(" Hypertension , Diabetes,,"),
            vec!["Hypertension".to_string(), "Diabetes".to_string()]
        );
    }

    #[test]
    fn test_parse_number_and_flag() {
        assert_eq!(parse_number(" 14.2 "), Some(14.2));
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("abc"), None);
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_from_cells_coerces_columns() {
        let record = PatientRecord::from_cells(|column| {
            let value = match column {
                "patient_id" => " P009 ",
                "name" => "Jane Doe",
                "birth_date" => "bad",
                "hemoglobin" => "11.5",
                "glucose" => "",
                "conditions" => "Anemia",
                "guardrail_violation_flag" => "True",
                _ => "",
            };
            value.to_string()
        });

        assert_eq!(record.patient_id, "P009");
        assert_eq!(record.birth_date, None);
        assert_eq!(record.hemoglobin, Some(11.5));
        assert_eq!(record.glucose, None);
        assert_eq!(record.conditions, vec!["Anemia".to_string()]);
        assert!(record.medications.is_empty());
        assert!(record.guardrail_violation_flag);
    }

    #[test]
    fn test_critical_thresholds() {
        let mut record = sample_record();
        assert!(!record.is_critical());

        record.glucose = Some(200.0);
        assert!(!record.is_critical());
        record.glucose = Some(200.5);
        assert!(record.is_critical());

        record.glucose = Some(95.0);
        record.hemoglobin = Some(11.9);
        assert!(record.is_critical());
    }

    #[test]
    fn test_has_condition_is_case_insensitive_substring() {
        let record = sample_record();
        assert!(record.has_condition("diabetes"));
        assert!(record.has_condition("HYPER"));
        assert!(!record.has_condition("asthma"));
    }

    #[test]
    fn test_clinical_excerpt_drops_identifiers() {
        let record = sample_record();
        let excerpt = record
            .clinical_excerpt(date(2024, 6, 1))
            .expect("complete record");

        assert_eq!(excerpt.age_years(), Some(45));
        assert_eq!(excerpt.gender(), "Male");
        let json = serde_json::to_string(&excerpt).expect("serialize excerpt");
        assert!(!json.contains("John Smith"));
        assert!(!json.contains("123-45-6789"));
        assert!(!json.contains("555-0101"));
        assert!(!json.contains("Main St"));
    }

    #[test]
    fn test_clinical_excerpt_requires_lab_values() {
        let mut record = sample_record();
        record.glucose = None;

        let err = record
            .clinical_excerpt(date(2024, 6, 1))
            .expect_err("glucose is missing");
        assert!(matches!(
            err,
            DatasetError::IncompleteRecord { field: "glucose", .. }
        ));
    }

    #[test]
    fn test_visited_within_is_inclusive() {
        let record = sample_record();
        assert!(record.visited_within(date(2024, 2, 14), 30));
        assert!(!record.visited_within(date(2024, 2, 15), 30));
    }
}
