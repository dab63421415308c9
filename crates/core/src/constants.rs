//! Constants used throughout the MediNext core crate.
//!
//! Thresholds and bins are kept here so the dashboard cards, analytics and activity feed agree
//! on what counts as "critical" or "elevated".

/// Environment variable naming the dataset file.
pub const ENV_DATASET_PATH: &str = "MEDINEXT_DATASET";

/// Default dataset location, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "data/synthetic_ehr_data.csv";

/// Columns every dataset file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "patient_id",
    "name",
    "sex",
    "birth_date",
    "address",
    "last_visit",
    "conditions",
    "medications",
    "hemoglobin",
    "glucose",
    "ssn",
    "phone_number",
    "guardrail_violation_flag",
];

/// Accepted date layouts, tried in order.
pub const DATE_FORMATS: &[&str] = &["%d-%b-%Y", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Accepted date-time layouts; only the date part is kept.
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];

/// Display layout for dates, e.g. `15-May-1979`.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%b-%Y";

/// Cell values meaning "nothing recorded" in list columns.
pub const EMPTY_LIST_MARKERS: &[&str] = &["none", "nan", "null", "-"];

/// Glucose above this (mg/dL) raises a critical alert.
pub const CRITICAL_GLUCOSE_MG_DL: f64 = 200.0;

/// Glucose above this (mg/dL) counts as elevated.
pub const ELEVATED_GLUCOSE_MG_DL: f64 = 126.0;

/// Hemoglobin below this (g/dL) raises a critical alert.
pub const LOW_HEMOGLOBIN_G_DL: f64 = 12.0;

pub const ACTIVE_WINDOW_DAYS: i64 = 180;
pub const TABLE_ACTIVE_WINDOW_DAYS: i64 = 365;
pub const RECENT_VISIT_DAYS: i64 = 30;
pub const VISIT_HISTORY_DAYS: i64 = 365;

/// Allowed page sizes for the patient list.
pub const PAGE_SIZES: &[usize] = &[10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum number of entries in the activity feed, and of patients it draws from.
pub const ACTIVITY_FEED_LIMIT: usize = 10;

/// Maximum number of conditions reported by analytics.
pub const TOP_CONDITIONS: usize = 10;

/// Age bins as half-open `[lower, upper)` ranges with their labels.
pub const AGE_BINS: &[(f64, f64, &str)] = &[
    (0.0, 18.0, "0-18"),
    (18.0, 30.0, "19-30"),
    (30.0, 45.0, "31-45"),
    (45.0, 60.0, "46-60"),
    (60.0, 75.0, "61-75"),
    (75.0, 100.0, "75+"),
];

/// Glucose bins (mg/dL) as half-open ranges.
pub const GLUCOSE_BINS: &[(f64, f64, &str)] = &[
    (0.0, 70.0, "Low"),
    (70.0, 100.0, "Normal"),
    (100.0, 126.0, "Pre-diabetes"),
    (126.0, 200.0, "Diabetes"),
    (200.0, 300.0, "High"),
];

/// Hemoglobin bins (g/dL) as half-open ranges.
pub const HEMOGLOBIN_BINS: &[(f64, f64, &str)] = &[
    (0.0, 12.0, "Low"),
    (12.0, 13.0, "Normal"),
    (13.0, 16.0, "High"),
    (16.0, 20.0, "Very High"),
];
