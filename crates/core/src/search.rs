//! Patient search and pagination for the patient table.

use crate::constants::{DISPLAY_DATE_FORMAT, PAGE_SIZES};
use crate::patient::PatientRecord;
use crate::{DatasetError, DatasetResult};
use chrono::NaiveDate;
use serde::Serialize;

/// Whether `record` matches a search term.
///
/// The term is matched case-insensitively as a substring of the patient id, name, any
/// condition or medication, the glucose value as text, the phone number or the SSN. A blank
/// term matches every record.
pub fn matches_search(record: &PatientRecord, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let contains = |value: &str| value.to_lowercase().contains(&term);
    contains(&record.patient_id)
        || contains(&record.name)
        || record.conditions.iter().any(|c| contains(c))
        || record.medications.iter().any(|m| contains(m))
        || record
            .glucose
            .is_some_and(|g| contains(&g.to_string()))
        || contains(&record.phone_number)
        || contains(&record.ssn)
}

/// Filter `records` by `term`, preserving dataset order.
pub fn search<'a>(records: &'a [PatientRecord], term: &str) -> Vec<&'a PatientRecord> {
    records
        .iter()
        .filter(|record| matches_search(record, term))
        .collect()
}

/// One page of results.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number after clamping.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

/// Check a requested page size against the allowed sizes.
pub fn validate_page_size(page_size: usize) -> DatasetResult<usize> {
    if PAGE_SIZES.contains(&page_size) {
        Ok(page_size)
    } else {
        Err(DatasetError::InvalidPageSize(page_size))
    }
}

/// Slice `items` into the requested page.
///
/// `total_pages` is at least 1 and `page` is clamped into `[1, total_pages]`, so an
/// out-of-range page yields the nearest valid one.
///
/// # Errors
///
/// Returns `DatasetError::InvalidPageSize` if `page_size` is not 10, 20, 50 or 100.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> DatasetResult<Page<T>> {
    let page_size = validate_page_size(page_size)?;
    let total_records = items.len();
    let total_pages = total_records.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_records);
    let items = items.get(start..end).unwrap_or_default().to_vec();

    Ok(Page {
        items,
        page,
        page_size,
        total_pages,
        total_records,
    })
}

/// Render a date as `dd-MMM-yyyy`, or `N/A` when absent.
pub fn format_display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PatientDataset;

    #[test]
    fn test_blank_term_matches_everything() {
        let dataset = PatientDataset::sample();
        assert_eq!(search(dataset.records(), "   ").len(), 5);
    }

    #[test]
    fn test_search_across_fields() {
        let dataset = PatientDataset::sample();
        let ids = |term: &str| -> Vec<String> {
            search(dataset.records(), term)
                .iter()
                .map(|r| r.patient_id.clone())
                .collect()
        };

        assert_eq!(ids("jane"), vec!["P002"]);
        assert_eq!(ids("HYPERTENSION"), vec!["P001"]);
        assert_eq!(ids("albuterol"), vec!["P003"]);
        assert_eq!(ids("120"), vec!["P002"]);
        assert_eq!(ids("555-0105"), vec!["P005"]);
        assert_eq!(ids("345-67"), vec!["P003"]);
        assert!(ids("no such patient").is_empty());
    }

    #[test]
    fn test_search_does_not_match_address() {
        let dataset = PatientDataset::sample();
        assert!(search(dataset.records(), "Maple").is_empty());
    }

    #[test]
    fn test_paginate_clamps_page() {
        let items: Vec<u32> = (1..=25).collect();

        let page = paginate(&items, 3, 10).expect("valid page size");
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);

        let page = paginate(&items, 99, 10).expect("valid page size");
        assert_eq!(page.page, 3);

        let page = paginate(&items, 0, 20).expect("valid page size");
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 20);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 5, 50).expect("valid page size");

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_paginate_rejects_unknown_page_size() {
        let items = vec![1, 2, 3];
        let err = paginate(&items, 1, 15).expect_err("15 is not allowed");
        assert!(matches!(err, DatasetError::InvalidPageSize(15)));
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(
            format_display_date(NaiveDate::from_ymd_opt(1979, 5, 15)),
            "15-May-1979"
        );
        assert_eq!(format_display_date(None), "N/A");
    }
}
