//! Column normalisation for raw lead sheets
//!
//! Lead sheets arrive with inconsistent headers ("E-mail", " phone number ",
//! "created_at", ...). This module maps recognised labels onto the canonical
//! field set and trims text cells. Unrecognised columns pass through unchanged.

use crate::app::models::{CellValue, LeadRecord, RawBatch};
use crate::constants::COLUMN_ALIASES;
use std::collections::HashSet;
use tracing::debug;

/// Canonical field for a raw column label, if the label is a recognised alias
///
/// Matching ignores case and surrounding whitespace.
pub fn canonical_label(label: &str) -> Option<&'static str> {
    let key = label.trim().to_lowercase();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}

/// Renaming plan for a schema: one output label per input column
///
/// A column already spelled as a canonical field keeps that name. Otherwise
/// the first alias of a field takes the canonical name and later ones keep
/// their original label. Output labels are always unique: a label that is
/// already taken gets a numeric suffix (`Email_2`).
pub fn column_mapping(columns: &[String]) -> Vec<(String, String)> {
    let exact: Vec<&'static str> = columns
        .iter()
        .filter_map(|label| canonical_label(label).filter(|canonical| label.trim() == *canonical))
        .collect();

    let mut claimed: Vec<&'static str> = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    columns
        .iter()
        .map(|label| {
            let canonical = canonical_label(label).filter(|canonical| {
                !claimed.contains(canonical)
                    && (label.trim() == *canonical || !exact.contains(canonical))
            });
            let target = match canonical {
                Some(canonical) => {
                    claimed.push(canonical);
                    canonical.to_string()
                }
                None => label.clone(),
            };
            let target = unique_label(target, &taken);
            taken.insert(target.clone());
            (label.clone(), target)
        })
        .collect()
}

fn unique_label(label: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&label) {
        return label;
    }
    (2..)
        .map(|n| format!("{}_{}", label, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(label)
}

/// Trim whitespace from text cells; other values are returned unchanged
pub fn trim_cell(value: CellValue) -> CellValue {
    match value {
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.len() == text.len() {
                CellValue::Text(text)
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        other => other,
    }
}

/// Normalise a single row against a precomputed column mapping
pub fn normalize_row(row: LeadRecord, mapping: &[(String, String)]) -> LeadRecord {
    let mut normalized = LeadRecord::new();
    for (label, value) in row.into_fields() {
        let target = mapping
            .iter()
            .find(|(source, _)| *source == label)
            .map(|(_, target)| target.clone())
            .unwrap_or(label);
        normalized.insert(target, trim_cell(value));
    }
    normalized
}

/// Normalise every column label and cell of a batch
pub fn normalize_batch(batch: RawBatch) -> RawBatch {
    let mapping = column_mapping(&batch.columns);

    let renamed = mapping.iter().filter(|(from, to)| from != to).count();
    debug!(
        "Normalising {} rows: {} of {} columns renamed",
        batch.rows.len(),
        renamed,
        batch.columns.len()
    );

    let columns = mapping.iter().map(|(_, target)| target.clone()).collect();
    let rows = batch
        .rows
        .into_iter()
        .map(|row| normalize_row(row, &mapping))
        .collect();

    RawBatch::new(columns, rows)
}
