//! Data models for lead processing
//!
//! This module contains the core data structures for representing lead-sheet
//! rows, tabular batches and the outcome of a simulated delivery.

use crate::constants::fields;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Cell Values
// =============================================================================

/// A single scalar cell from a lead sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// Borrow the string content of a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render any non-null cell as text (numbers and booleans included)
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(value) => write!(f, "{}", value),
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

// =============================================================================
// Lead Record
// =============================================================================

/// One lead-sheet row: an ordered mapping of column label to cell value
///
/// The same type carries raw rows (arbitrary labels) and normalised rows
/// (canonical labels from [`fields`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    fields: Vec<(String, CellValue)>,
}

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from label/value pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut record = Self::new();
        for (label, value) in pairs {
            record.insert(label, value);
        }
        record
    }

    /// Set a field, replacing an existing value in place or appending a new column
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<CellValue>) {
        let label = label.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Column labels in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(label, _)| label.as_str())
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<(String, CellValue)> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed text of a field; `None` when absent, null or blank
    pub fn trimmed_text(&self, label: &str) -> Option<String> {
        self.get(label)
            .and_then(CellValue::to_text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Identity key: the trimmed Email, if present and non-blank
    ///
    /// Matching is exact; two addresses differing only in case are distinct leads.
    pub fn email(&self) -> Option<String> {
        self.trimmed_text(fields::EMAIL)
    }

    pub fn name(&self) -> Option<String> {
        self.trimmed_text(fields::NAME)
    }
}

// =============================================================================
// Tabular Batch
// =============================================================================

/// An ordered batch of rows plus the schema (column labels) they came with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    pub columns: Vec<String>,
    pub rows: Vec<LeadRecord>,
}

impl RawBatch {
    pub fn new(columns: Vec<String>, rows: Vec<LeadRecord>) -> Self {
        Self { columns, rows }
    }

    /// Build a batch whose schema is the union of row labels in first-seen order
    pub fn from_rows(rows: Vec<LeadRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for label in row.labels() {
                if !columns.iter().any(|c| c == label) {
                    columns.push(label.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Delivery Outcome
// =============================================================================

/// External step a lead is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryChannel {
    Crm,
    Notification,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryChannel::Crm => f.write_str("CRM"),
            DeliveryChannel::Notification => f.write_str("notification"),
        }
    }
}

/// Result of one simulated send
///
/// Outcomes are created once per call and never modified. A failed delivery
/// is a value, not an error, so a batch always continues past it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    channel: DeliveryChannel,
    success: bool,
    message: String,
    lead: LeadRecord,
}

impl DeliveryOutcome {
    pub fn success(channel: DeliveryChannel, message: impl Into<String>, lead: LeadRecord) -> Self {
        Self {
            channel,
            success: true,
            message: message.into(),
            lead,
        }
    }

    pub fn failure(channel: DeliveryChannel, message: impl Into<String>, lead: LeadRecord) -> Self {
        Self {
            channel,
            success: false,
            message: message.into(),
            lead,
        }
    }

    pub fn channel(&self) -> DeliveryChannel {
        self.channel
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The record the send was attempted with
    pub fn lead(&self) -> &LeadRecord {
        &self.lead
    }
}
