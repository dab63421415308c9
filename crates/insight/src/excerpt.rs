//! The clinical excerpt: the only patient data that leaves the process.
//!
//! The type deliberately has no slot for a name, national id, address or phone number, so an
//! excerpt cannot carry a direct identifier no matter what the source record held.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Identifier-free snapshot of one patient's clinical fields, built per request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientClinicalExcerpt {
    birth_date: Option<NaiveDate>,
    gender: String,
    conditions: Vec<String>,
    /// Grams per decilitre, the unit the dataset records.
    hemoglobin_g_dl: f64,
    medications: Vec<String>,
    glucose_mg_dl: f64,
    captured_on: NaiveDate,
}

impl PatientClinicalExcerpt {
    /// Creates a new excerpt.
    ///
    /// List entries are trimmed and blank entries dropped. `captured_on` is the date the
    /// snapshot was taken and anchors the age rendered in the prompt.
    pub fn new(
        birth_date: Option<NaiveDate>,
        gender: impl Into<String>,
        conditions: Vec<String>,
        hemoglobin_g_dl: f64,
        medications: Vec<String>,
        glucose_mg_dl: f64,
        captured_on: NaiveDate,
    ) -> Self {
        Self {
            birth_date,
            gender: gender.into().trim().to_string(),
            conditions: clean_list(conditions),
            hemoglobin_g_dl,
            medications: clean_list(medications),
            glucose_mg_dl,
            captured_on,
        }
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn hemoglobin_g_dl(&self) -> f64 {
        self.hemoglobin_g_dl
    }

    pub fn medications(&self) -> &[String] {
        &self.medications
    }

    pub fn glucose_mg_dl(&self) -> f64 {
        self.glucose_mg_dl
    }

    pub fn captured_on(&self) -> NaiveDate {
        self.captured_on
    }

    /// Age in whole years on the capture date, if the birth date is known and not in the future.
    pub fn age_years(&self) -> Option<u32> {
        self.birth_date
            .and_then(|birth| age_on(birth, self.captured_on))
    }
}

/// Age in completed years on `on` for someone born on `birth`.
///
/// Returns `None` when `birth` is after `on`.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    if birth > on {
        return None;
    }
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
