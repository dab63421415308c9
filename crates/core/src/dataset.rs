//! Loading the patient dataset from CSV or JSON.
//!
//! The dataset is read once at startup and shared read-only afterwards. A missing or broken
//! file is not fatal for the dashboard: [`PatientDataset::load_or_sample`] falls back to a small
//! built-in sample set and records that it did so.

use crate::constants::REQUIRED_COLUMNS;
use crate::patient::PatientRecord;
use crate::{DatasetError, DatasetResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the loaded records came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DatasetSource {
    File(PathBuf),
    Sample,
}

/// The loaded, read-only patient dataset.
#[derive(Clone, Debug)]
pub struct PatientDataset {
    records: Vec<PatientRecord>,
    source: DatasetSource,
}

impl PatientDataset {
    pub fn new(records: Vec<PatientRecord>, source: DatasetSource) -> Self {
        Self { records, source }
    }

    /// Load a dataset file. Files ending in `.json` are read as an array of objects, anything
    /// else as CSV with a header row.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DatasetError::FileRead` if the file cannot be opened
    /// - `DatasetError::Csv` / `DatasetError::Json` if the content cannot be parsed
    /// - `DatasetError::MissingColumns` if required columns are absent
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let file = File::open(path).map_err(DatasetError::FileRead)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let records = if is_json {
            read_json(file)?
        } else {
            read_csv(file)?
        };

        warn_on_blank_identity(&records);
        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "patient dataset loaded"
        );

        Ok(Self::new(records, DatasetSource::File(path.to_path_buf())))
    }

    /// Load `path`, falling back to the built-in sample set when it is missing or invalid.
    pub fn load_or_sample(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "dataset file not found, using sample data"
            );
            return Self::sample();
        }

        match Self::load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "dataset load failed, using sample data");
                Self::sample()
            }
        }
    }

    /// The five-patient demonstration set.
    pub fn sample() -> Self {
        let rows: [[&str; 13]; 5] = [
            [
                "P001", "John A Doe", "M", "1979-05-15", "123 Main St", "2024-01-15",
                "Hypertension", "Lisinopril", "14.2", "95", "123-45-6789", "555-0101", "false",
            ],
            [
                "P002", "Jane B Smith", "F", "1992-08-20", "456 Oak Ave", "2024-01-20",
                "Diabetes", "Metformin", "13.8", "120", "234-56-7890", "555-0102", "true",
            ],
            [
                "P003", "Mike C Johnson", "M", "1966-03-10", "789 Pine Rd", "2024-01-18",
                "Asthma", "Albuterol", "15.1", "88", "345-67-8901", "555-0103", "false",
            ],
            [
                "P004", "Sarah D Wilson", "F", "1995-11-25", "321 Elm St", "2024-01-22",
                "None", "None", "14.5", "92", "456-78-9012", "555-0104", "false",
            ],
            [
                "P005", "David E Brown", "M", "1957-12-03", "654 Maple Dr", "2024-01-19",
                "Arthritis", "Ibuprofen", "13.9", "105", "567-89-0123", "555-0105", "true",
            ],
        ];

        let records = rows
            .iter()
            .map(|row| {
                PatientRecord::from_cells(|column| {
                    REQUIRED_COLUMNS
                        .iter()
                        .position(|c| *c == column)
                        .map(|i| row[i].to_string())
                        .unwrap_or_default()
                })
            })
            .collect();

        Self::new(records, DatasetSource::Sample)
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact match on patient id after trimming.
    pub fn find(&self, patient_id: &str) -> Option<&PatientRecord> {
        let patient_id = patient_id.trim();
        self.records.iter().find(|r| r.patient_id == patient_id)
    }
}

fn missing_columns<'a, I>(present: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = present.into_iter().map(str::trim).collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect()
}

fn read_csv<R: Read>(reader: R) -> DatasetResult<Vec<PatientRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(DatasetError::Csv)?.clone();
    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim(), i))
        .collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(DatasetError::Csv)?;
        records.push(PatientRecord::from_cells(|column| {
            index
                .get(column)
                .and_then(|&i| row.get(i))
                .unwrap_or_default()
                .to_string()
        }));
    }

    Ok(records)
}

fn read_json<R: Read>(reader: R) -> DatasetResult<Vec<PatientRecord>> {
    let rows: Vec<Map<String, Value>> =
        serde_json::from_reader(reader).map_err(DatasetError::Json)?;

    if let Some(first) = rows.first() {
        let missing = missing_columns(first.keys().map(String::as_str));
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }
    }

    Ok(rows
        .iter()
        .map(|row| {
            PatientRecord::from_cells(|column| row.get(column).map(cell_text).unwrap_or_default())
        })
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn warn_on_blank_identity(records: &[PatientRecord]) {
    let blank = records
        .iter()
        .filter(|r| r.patient_id.is_empty() || r.name.is_empty())
        .count();
    if blank > 0 {
        tracing::warn!(rows = blank, "rows with blank patient_id or name");
    }
}
