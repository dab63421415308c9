//! # MediNext Core
//!
//! Core logic for the MediNext clinical dashboard.
//!
//! This crate contains pure data operations over the patient dataset:
//! - Loading CSV/JSON datasets with coercion and a sample-data fallback
//! - Patient search and pagination
//! - Dashboard metrics, analytics distributions and the activity feed
//! - Building the identifier-free clinical excerpt for AI analysis
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and `cli`.
//! Talking to the Superwise API belongs in `medinext-insight`.

#![warn(rust_2018_idioms)]

pub mod activity;
pub mod analytics;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod patient;
pub mod schedule;
pub mod search;

pub use activity::{Activity, ActivityFeed, ActivityKind, Priority};
pub use analytics::{CountEntry, HealthRisks, PatientAnalytics};
pub use config::{resolve_dataset_path, CoreConfig};
pub use dataset::{DatasetSource, PatientDataset};
pub use error::{DatasetError, DatasetResult};
pub use metrics::{DashboardMetrics, PatientTableSummary};
pub use patient::PatientRecord;
pub use schedule::{Appointment, AppointmentStatus, Prescription, PrescriptionStatus};
pub use search::{format_display_date, Page};

use chrono::{NaiveDate, NaiveDateTime};
use medinext_insight::PatientClinicalExcerpt;
use std::sync::Arc;

/// Read-only queries over a loaded dataset.
///
/// Cheap to clone; the dataset is shared. Every time-dependent query takes the reference date
/// or timestamp explicitly so results are reproducible.
#[derive(Clone, Debug)]
pub struct DashboardService {
    dataset: Arc<PatientDataset>,
}

impl DashboardService {
    pub fn new(dataset: Arc<PatientDataset>) -> Self {
        Self { dataset }
    }

    /// Load the dataset named by `cfg`, falling back to the sample set.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(Arc::new(PatientDataset::load_or_sample(cfg.dataset_path())))
    }

    pub fn dataset(&self) -> &PatientDataset {
        &self.dataset
    }

    /// Search and paginate the patient list.
    ///
    /// # Arguments
    ///
    /// * `term` - Search term; blank matches every patient.
    /// * `page` - 1-based page number, clamped into range.
    /// * `page_size` - One of 10, 20, 50 or 100.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvalidPageSize` for any other page size.
    pub fn list_patients(
        &self,
        term: &str,
        page: usize,
        page_size: usize,
    ) -> DatasetResult<Page<PatientRecord>> {
        let matches: Vec<PatientRecord> = search::search(self.dataset.records(), term)
            .into_iter()
            .cloned()
            .collect();
        search::paginate(&matches, page, page_size)
    }

    /// # Errors
    ///
    /// Returns `DatasetError::PatientNotFound` if no record has this id.
    pub fn patient(&self, patient_id: &str) -> DatasetResult<&PatientRecord> {
        self.dataset
            .find(patient_id)
            .ok_or_else(|| DatasetError::PatientNotFound(patient_id.trim().to_string()))
    }

    /// Build the clinical excerpt for one patient, captured on `today`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::PatientNotFound` for an unknown id, or
    /// `DatasetError::IncompleteRecord` if the record lacks a lab value.
    pub fn clinical_excerpt(
        &self,
        patient_id: &str,
        today: NaiveDate,
    ) -> DatasetResult<PatientClinicalExcerpt> {
        self.patient(patient_id)?.clinical_excerpt(today)
    }

    pub fn table_summary(&self, today: NaiveDate) -> PatientTableSummary {
        metrics::table_summary(self.dataset.records(), today)
    }

    pub fn dashboard_metrics(&self, today: NaiveDate) -> DashboardMetrics {
        metrics::dashboard_metrics(self.dataset.records(), today)
    }

    pub fn analytics(&self, today: NaiveDate) -> Option<PatientAnalytics> {
        analytics::patient_analytics(self.dataset.records(), today)
    }

    pub fn activity_feed(&self, now: NaiveDateTime) -> ActivityFeed {
        activity::activity_feed(self.dataset.records(), now)
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        schedule::todays_appointments()
    }

    pub fn prescriptions(&self) -> Vec<Prescription> {
        schedule::current_prescriptions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> DashboardService {
        DashboardService::new(Arc::new(PatientDataset::sample()))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date")
    }

    #[test]
    fn test_list_patients_searches_then_paginates() {
        let page = service()
            .list_patients("diabetes", 1, 10)
            .expect("valid page size");

        assert_eq!(page.total_records, 1);
        assert_eq!(page.items[0].patient_id, "P002");
    }

    #[test]
    fn test_unknown_patient_is_not_found() {
        let err = service()
            .patient("P999")
            .expect_err("no such patient");
        assert!(matches!(err, DatasetError::PatientNotFound(id) if id == "P999"));
    }

    #[test]
    fn test_clinical_excerpt_for_sample_patient() {
        let excerpt = service()
            .clinical_excerpt("P003", today())
            .expect("complete record");

        assert_eq!(excerpt.age_years(), Some(57));
        assert_eq!(excerpt.glucose_mg_dl(), 88.0);
        assert_eq!(excerpt.conditions(), &["Asthma".to_string()]);
    }

    #[test]
    fn test_from_config_falls_back_to_sample() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().join("missing.csv"));

        let service = DashboardService::from_config(&cfg);
        assert_eq!(service.dataset().source(), &DatasetSource::Sample);
        assert_eq!(service.appointments().len(), 4);
        assert_eq!(service.prescriptions().len(), 4);
    }
}
