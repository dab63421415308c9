//! JSON request and response types for the REST API.
//!
//! Core types stay free of OpenAPI concerns; these mirror them with `ToSchema` and plain
//! string dates (`YYYY-MM-DD`).

use chrono::NaiveDate;
use medinext_core::{
    Activity, ActivityFeed, Appointment, CountEntry, DashboardMetrics, HealthRisks, Page,
    PatientAnalytics, PatientRecord, PatientTableSummary, Prescription,
};
use medinext_insight::{is_guardrail_violation, AnalysisResult};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPatientsQuery {
    /// Case-insensitive search term.
    pub search: Option<String>,
    /// 1-based page number; out-of-range values are clamped.
    pub page: Option<usize>,
    /// One of 10, 20, 50, 100.
    pub page_size: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDto {
    pub patient_id: String,
    pub name: String,
    pub sex: String,
    pub birth_date: Option<String>,
    pub age: Option<u32>,
    pub address: String,
    pub last_visit: Option<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub hemoglobin: Option<f64>,
    pub glucose: Option<f64>,
    pub ssn: String,
    pub phone_number: String,
    pub guardrail_violation_flag: bool,
}

impl PatientDto {
    /// `age` is computed on `today`.
    pub fn from_record(record: &PatientRecord, today: NaiveDate) -> Self {
        Self {
            patient_id: record.patient_id.clone(),
            name: record.name.clone(),
            sex: record.sex.clone(),
            birth_date: record.birth_date.map(|d| d.to_string()),
            age: record.age_on(today),
            address: record.address.clone(),
            last_visit: record.last_visit.map(|d| d.to_string()),
            conditions: record.conditions.clone(),
            medications: record.medications.clone(),
            hemoglobin: record.hemoglobin,
            glucose: record.glucose,
            ssn: record.ssn.clone(),
            phone_number: record.phone_number.clone(),
            guardrail_violation_flag: record.guardrail_violation_flag,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientDto>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl ListPatientsRes {
    pub fn from_page(page: Page<PatientRecord>, today: NaiveDate) -> Self {
        Self {
            patients: page
                .items
                .iter()
                .map(|r| PatientDto::from_record(r, today))
                .collect(),
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            total_records: page.total_records,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummaryRes {
    pub total_patients: usize,
    pub active_patients: usize,
    pub avg_hemoglobin: Option<f64>,
    pub avg_glucose: Option<f64>,
}

impl From<PatientTableSummary> for PatientSummaryRes {
    fn from(s: PatientTableSummary) -> Self {
        Self {
            total_patients: s.total_patients,
            active_patients: s.active_patients,
            avg_hemoglobin: s.avg_hemoglobin,
            avg_glucose: s.avg_glucose,
        }
    }
}

/// Outcome of an AI analysis request.
///
/// `analysis` is set on success; `message` always carries a clinician-facing summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsightRes {
    pub patient_id: String,
    /// `success`, `config_error`, `timeout`, `network_error`, `api_error` or `unexpected_error`.
    pub kind: String,
    pub success: bool,
    pub analysis: Option<String>,
    pub message: String,
    /// The answer reads as a guardrail refusal from the remote agent.
    pub guardrail_violation: bool,
}

impl InsightRes {
    pub fn from_result(patient_id: impl Into<String>, result: &AnalysisResult) -> Self {
        let analysis = result.text().map(str::to_string);
        Self {
            patient_id: patient_id.into(),
            kind: result.kind().to_string(),
            success: result.is_success(),
            guardrail_violation: analysis.as_deref().is_some_and(is_guardrail_violation),
            analysis,
            message: result.user_message(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsightStatusRes {
    pub configured: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetricsRes {
    pub total_patients: usize,
    pub active_patients: usize,
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

impl From<DashboardMetrics> for DashboardMetricsRes {
    fn from(m: DashboardMetrics) -> Self {
        Self {
            total_patients: m.total_patients,
            active_patients: m.active_patients,
            recent_visits: m.recent_visits,
            critical_alerts: m.critical_alerts,
            avg_age: m.avg_age,
            diabetes_patients: m.diabetes_patients,
            diabetes_percentage: m.diabetes_percentage,
            hypertension_patients: m.hypertension_patients,
            hypertension_percentage: m.hypertension_percentage,
            guardrail_violations: m.guardrail_violations,
            healthy_patients: m.healthy_patients,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountDto {
    pub label: String,
    pub count: usize,
}

impl From<CountEntry> for CountDto {
    fn from(e: CountEntry) -> Self {
        Self {
            label: e.label,
            count: e.count,
        }
    }
}

fn counts(entries: Vec<CountEntry>) -> Vec<CountDto> {
    entries.into_iter().map(CountDto::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRisksDto {
    pub high_glucose: usize,
    pub low_hemoglobin: usize,
    pub guardrail_violations: usize,
}

impl From<HealthRisks> for HealthRisksDto {
    fn from(r: HealthRisks) -> Self {
        Self {
            high_glucose: r.high_glucose,
            low_hemoglobin: r.low_hemoglobin,
            guardrail_violations: r.guardrail_violations,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsRes {
    pub total_patients: usize,
    pub condition_counts: Vec<CountDto>,
    pub age_distribution: Vec<CountDto>,
    pub gender_distribution: Vec<CountDto>,
    pub visits_by_month: Vec<CountDto>,
    pub glucose_distribution: Vec<CountDto>,
    pub hemoglobin_distribution: Vec<CountDto>,
    pub avg_age: Option<u32>,
    pub avg_glucose: Option<f64>,
    pub avg_hemoglobin: Option<f64>,
    pub risks: HealthRisksDto,
}

impl From<PatientAnalytics> for AnalyticsRes {
    fn from(a: PatientAnalytics) -> Self {
        Self {
            total_patients: a.total_patients,
            condition_counts: counts(a.condition_counts),
            age_distribution: counts(a.age_distribution),
            gender_distribution: counts(a.gender_distribution),
            visits_by_month: counts(a.visits_by_month),
            glucose_distribution: counts(a.glucose_distribution),
            hemoglobin_distribution: counts(a.hemoglobin_distribution),
            avg_age: a.avg_age,
            avg_glucose: a.avg_glucose,
            avg_hemoglobin: a.avg_hemoglobin,
            risks: a.risks.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityDto {
    pub time: String,
    pub activity: String,
    /// `alert`, `questionnaire`, `appointment`, `lab_result` or `prescription`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `critical` or `normal`.
    pub priority: String,
}

impl From<Activity> for ActivityDto {
    fn from(a: Activity) -> Self {
        Self {
            time: a.time,
            activity: a.activity,
            kind: a.kind.as_str().to_string(),
            priority: a.priority.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityFeedRes {
    pub activities: Vec<ActivityDto>,
    pub total: usize,
    pub critical: usize,
    pub normal: usize,
}

impl From<ActivityFeed> for ActivityFeedRes {
    fn from(f: ActivityFeed) -> Self {
        Self {
            activities: f.activities.into_iter().map(ActivityDto::from).collect(),
            total: f.total,
            critical: f.critical,
            normal: f.normal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDto {
    pub time: String,
    pub patient: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            time: a.time.to_string(),
            patient: a.patient.to_string(),
            kind: a.kind.to_string(),
            status: a.status.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionDto {
    pub patient: String,
    pub medication: String,
    pub dosage: String,
    pub status: String,
}

impl From<Prescription> for PrescriptionDto {
    fn from(p: Prescription) -> Self {
        Self {
            patient: p.patient.to_string(),
            medication: p.medication.to_string(),
            dosage: p.dosage.to_string(),
            status: p.status.to_string(),
        }
    }
}
