//! # API REST
//!
//! REST API implementation for MediNext.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response types. The AI analysis call is blocking and runs on
//! the blocking thread pool so it never stalls the async runtime.

#![warn(rust_2018_idioms)]

use api_shared::{
    ActivityDto, ActivityFeedRes, AnalyticsRes, AppointmentDto, CountDto, DashboardMetricsRes,
    HealthRes, HealthRisksDto, HealthService, InsightRes, InsightStatusRes, ListPatientsQuery,
    ListPatientsRes, PatientDto, PatientSummaryRes, PrescriptionDto,
};
use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Local;
use medinext_core::constants::DEFAULT_PAGE_SIZE;
use medinext_core::{DashboardService, DatasetError};
use medinext_insight::InsightProvider;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server.
///
/// Holds the loaded dataset behind `DashboardService` and the AI provider. Both are resolved
/// once at startup.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub insight: Arc<dyn InsightProvider>,
}

impl AppState {
    pub fn new(dashboard: DashboardService, insight: Arc<dyn InsightProvider>) -> Self {
        Self { dashboard, insight }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        patient_summary,
        get_patient,
        analyze_patient,
        insight_status,
        dashboard_metrics,
        dashboard_analytics,
        dashboard_activity,
        list_appointments,
        list_prescriptions,
    ),
    components(schemas(
        HealthRes,
        PatientDto,
        ListPatientsRes,
        PatientSummaryRes,
        InsightRes,
        InsightStatusRes,
        DashboardMetricsRes,
        AnalyticsRes,
        CountDto,
        HealthRisksDto,
        ActivityFeedRes,
        ActivityDto,
        AppointmentDto,
        PrescriptionDto,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients))
        .route("/patients/summary", get(patient_summary))
        .route("/patients/:id", get(get_patient))
        .route("/patients/:id/insight", post(analyze_patient))
        .route("/insight/status", get(insight_status))
        .route("/dashboard/metrics", get(dashboard_metrics))
        .route("/dashboard/analytics", get(dashboard_analytics))
        .route("/dashboard/activity", get(dashboard_activity))
        .route("/appointments", get(list_appointments))
        .route("/prescriptions", get(list_prescriptions))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a dataset error to a status code and a short message.
fn dataset_error_response(e: &DatasetError) -> (StatusCode, &'static str) {
    match e {
        DatasetError::PatientNotFound(_) => (StatusCode::NOT_FOUND, "Patient not found"),
        DatasetError::IncompleteRecord { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Patient record lacks hemoglobin or glucose",
        ),
        DatasetError::InvalidPageSize(_) => (
            StatusCode::BAD_REQUEST,
            "page_size must be one of 10, 20, 50, 100",
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    params(ListPatientsQuery),
    responses(
        (status = 200, description = "One page of matching patients", body = ListPatientsRes),
        (status = 400, description = "Invalid page size")
    )
)]
/// Search and paginate the patient list.
///
/// # Arguments
/// * `search` - Optional case-insensitive term matched against id, name, conditions,
///   medications, glucose, phone number and SSN
/// * `page` - 1-based page number (default 1), clamped into range
/// * `page_size` - 10, 20, 50 or 100 (default 10)
///
/// # Errors
/// Returns `400 Bad Request` if `page_size` is not an allowed size.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<ListPatientsRes>, (StatusCode, &'static str)> {
    let term = query.search.unwrap_or_default();
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    match state.dashboard.list_patients(&term, page, page_size) {
        Ok(page) => Ok(Json(ListPatientsRes::from_page(
            page,
            Local::now().date_naive(),
        ))),
        Err(e) => {
            tracing::warn!("List patients error: {}", e);
            Err(dataset_error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/patients/summary",
    responses(
        (status = 200, description = "Patient table summary", body = PatientSummaryRes)
    )
)]
#[axum::debug_handler]
async fn patient_summary(State(state): State<AppState>) -> Json<PatientSummaryRes> {
    Json(state.dashboard.table_summary(Local::now().date_naive()).into())
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient record", body = PatientDto),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientDto>, (StatusCode, &'static str)> {
    match state.dashboard.patient(&id) {
        Ok(record) => Ok(Json(PatientDto::from_record(
            record,
            Local::now().date_naive(),
        ))),
        Err(e) => Err(dataset_error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/patients/{id}/insight",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Classified analysis outcome", body = InsightRes),
        (status = 404, description = "Patient not found"),
        (status = 422, description = "Patient record lacks hemoglobin or glucose"),
        (status = 500, description = "Internal server error")
    )
)]
/// Request an AI clinical interpretation for one patient.
///
/// Only the identifier-free clinical excerpt leaves the process. The call blocks for up to
/// `(max_retries + 1) * timeout` plus retry delays, so it runs on the blocking pool.
///
/// # Returns
/// * `Ok(Json<InsightRes>)` - Any classified outcome, including remote failures; check
///   `success` and `kind`
///
/// # Errors
/// Returns:
/// - `404 Not Found` for an unknown patient id,
/// - `422 Unprocessable Entity` if hemoglobin or glucose is missing,
/// - `500 Internal Server Error` if the blocking task fails.
#[axum::debug_handler]
async fn analyze_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<InsightRes>, (StatusCode, &'static str)> {
    let excerpt = match state
        .dashboard
        .clinical_excerpt(&id, Local::now().date_naive())
    {
        Ok(excerpt) => excerpt,
        Err(e) => {
            tracing::warn!("Clinical excerpt error: {}", e);
            return Err(dataset_error_response(&e));
        }
    };

    let provider = state.insight.clone();
    let correlation_id = uuid::Uuid::new_v4().simple().to_string();
    let result =
        tokio::task::spawn_blocking(move || provider.analyze(&excerpt, &correlation_id))
            .await
            .map_err(|e| {
                tracing::error!("Insight task error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            })?;

    Ok(Json(InsightRes::from_result(id.trim(), &result)))
}

#[utoipa::path(
    get,
    path = "/insight/status",
    responses(
        (status = 200, description = "Whether AI analysis is configured", body = InsightStatusRes)
    )
)]
#[axum::debug_handler]
async fn insight_status(State(state): State<AppState>) -> Json<InsightStatusRes> {
    let configured = state.insight.is_configured();
    let message = if configured {
        "Superwise API is configured"
    } else {
        "Superwise API is not configured; set SUPERWISE_API_URL and SUPERWISE_APP_ID"
    };
    Json(InsightStatusRes {
        configured,
        message: message.into(),
    })
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics",
    responses(
        (status = 200, description = "Dashboard card figures", body = DashboardMetricsRes)
    )
)]
#[axum::debug_handler]
async fn dashboard_metrics(State(state): State<AppState>) -> Json<DashboardMetricsRes> {
    Json(
        state
            .dashboard
            .dashboard_metrics(Local::now().date_naive())
            .into(),
    )
}

#[utoipa::path(
    get,
    path = "/dashboard/analytics",
    responses(
        (status = 200, description = "Chart distributions and averages", body = AnalyticsRes),
        (status = 404, description = "No patient data available")
    )
)]
#[axum::debug_handler]
async fn dashboard_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsRes>, (StatusCode, &'static str)> {
    state
        .dashboard
        .analytics(Local::now().date_naive())
        .map(|analytics| Json(analytics.into()))
        .ok_or((StatusCode::NOT_FOUND, "No patient data available"))
}

#[utoipa::path(
    get,
    path = "/dashboard/activity",
    responses(
        (status = 200, description = "Recent patient activities", body = ActivityFeedRes)
    )
)]
#[axum::debug_handler]
async fn dashboard_activity(State(state): State<AppState>) -> Json<ActivityFeedRes> {
    Json(
        state
            .dashboard
            .activity_feed(Local::now().naive_local())
            .into(),
    )
}

#[utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "Today's appointments", body = [AppointmentDto])
    )
)]
#[axum::debug_handler]
async fn list_appointments(State(state): State<AppState>) -> Json<Vec<AppointmentDto>> {
    Json(
        state
            .dashboard
            .appointments()
            .into_iter()
            .map(AppointmentDto::from)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/prescriptions",
    responses(
        (status = 200, description = "Current prescriptions", body = [PrescriptionDto])
    )
)]
#[axum::debug_handler]
async fn list_prescriptions(State(state): State<AppState>) -> Json<Vec<PrescriptionDto>> {
    Json(
        state
            .dashboard
            .prescriptions()
            .into_iter()
            .map(PrescriptionDto::from)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use medinext_core::{DatasetSource, PatientDataset};
    use medinext_insight::{AnalysisResult, PatientClinicalExcerpt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Returns a fixed result and records what it was asked.
    struct StubInsight {
        result: AnalysisResult,
        calls: AtomicUsize,
        last_excerpt: Mutex<Option<PatientClinicalExcerpt>>,
    }

    impl StubInsight {
        fn new(result: AnalysisResult) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
                last_excerpt: Mutex::new(None),
            })
        }
    }

    impl InsightProvider for StubInsight {
        fn analyze(&self, excerpt: &PatientClinicalExcerpt, _correlation_id: &str) -> AnalysisResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_excerpt.lock().expect("lock excerpt") = Some(excerpt.clone());
            self.result.clone()
        }

        fn is_configured(&self) -> bool {
            !matches!(self.result, AnalysisResult::ConfigError { .. })
        }
    }

    fn app_with(dataset: PatientDataset, insight: Arc<StubInsight>) -> Router {
        router(AppState::new(
            DashboardService::new(Arc::new(dataset)),
            insight,
        ))
    }

    fn sample_app(insight: Arc<StubInsight>) -> Router {
        app_with(PatientDataset::sample(), insight)
    }

    fn ok_stub() -> Arc<StubInsight> {
        StubInsight::new(AnalysisResult::Success {
            text: "Low cardiovascular risk.".into(),
        })
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(sample_app(ok_stub()), "GET", "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_list_patients_with_search_and_page_size() {
        let (status, json) =
            send(sample_app(ok_stub()), "GET", "/patients?search=metformin&page_size=20").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_records"], 1);
        assert_eq!(json["page_size"], 20);
        assert_eq!(json["patients"][0]["patient_id"], "P002");
    }

    #[tokio::test]
    async fn test_list_patients_rejects_page_size() {
        let (status, _) = send(sample_app(ok_stub()), "GET", "/patients?page_size=7").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_patient_and_not_found() {
        let (status, json) = send(sample_app(ok_stub()), "GET", "/patients/P003").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Mike C Johnson");

        let (status, _) = send(sample_app(ok_stub()), "GET", "/patients/P404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_insight_sends_excerpt_and_returns_answer() {
        let stub = ok_stub();
        let (status, json) = send(sample_app(stub.clone()), "POST", "/patients/P001/insight").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["analysis"], "Low cardiovascular risk.");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        let excerpt = stub
            .last_excerpt
            .lock()
            .expect("lock excerpt")
            .clone()
            .expect("excerpt captured");
        assert_eq!(excerpt.glucose_mg_dl(), 95.0);
        assert_eq!(excerpt.hemoglobin_g_dl(), 14.2);
    }

    #[tokio::test]
    async fn test_insight_failure_is_reported_in_body() {
        let stub = StubInsight::new(AnalysisResult::ApiError {
            status_code: 503,
            body: "unavailable".into(),
        });
        let (status, json) = send(sample_app(stub), "POST", "/patients/P001/insight").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["kind"], "api_error");
        assert_eq!(json["analysis"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_insight_for_incomplete_record_is_unprocessable() {
        let mut records = PatientDataset::sample().records().to_vec();
        records[0].hemoglobin = None;
        let stub = ok_stub();
        let app = app_with(PatientDataset::new(records, DatasetSource::Sample), stub.clone());

        let (status, _) = send(app, "POST", "/patients/P001/insight").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_insight_status_reflects_provider() {
        let stub = StubInsight::new(AnalysisResult::ConfigError {
            reason: "missing".into(),
        });
        let (_, json) = send(sample_app(stub), "GET", "/insight/status").await;
        assert_eq!(json["configured"], false);

        let (_, json) = send(sample_app(ok_stub()), "GET", "/insight/status").await;
        assert_eq!(json["configured"], true);
    }

    #[tokio::test]
    async fn test_dashboard_endpoints() {
        let (status, json) = send(sample_app(ok_stub()), "GET", "/dashboard/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_patients"], 5);
        assert_eq!(json["guardrail_violations"], 2);

        let (status, json) = send(sample_app(ok_stub()), "GET", "/dashboard/analytics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["age_distribution"].as_array().map(Vec::len), Some(6));

        let (status, json) = send(sample_app(ok_stub()), "GET", "/dashboard/activity").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["activities"].is_array());
    }

    #[tokio::test]
    async fn test_analytics_for_empty_dataset_is_not_found() {
        let app = app_with(PatientDataset::new(Vec::new(), DatasetSource::Sample), ok_stub());
        let (status, _) = send(app, "GET", "/dashboard/analytics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_lists() {
        let (_, json) = send(sample_app(ok_stub()), "GET", "/appointments").await;
        assert_eq!(json[0]["type"], "Follow-up");

        let (_, json) = send(sample_app(ok_stub()), "GET", "/prescriptions").await;
        assert_eq!(json[2]["status"], "Refill Needed");
    }
}
