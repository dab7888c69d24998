use indicatif::ProgressBar;
use log::{debug, warn};
use std::collections::HashMap;

use crate::decoder;
use crate::error::RowError;
use crate::fields::{COOKIE_COLUMN, ID_COLUMN, PAGE_URL_FIELD};
use crate::query;
use crate::reconcile::{reconcile, Reconciled};

/// One CSV data row keyed by its (trimmed) header names.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub record_id: String,
    pub fields: Reconciled,
}

impl OutputRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        if field == crate::fields::RECORD_ID_COLUMN {
            return Some(&self.record_id);
        }
        self.fields.iter().find(|(f, _)| *f == field).map(|(_, v)| v.as_str())
    }

    /// Values in output column order, `Record ID` first.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.record_id.as_str()).chain(self.fields.iter().map(|(_, v)| v.as_str()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipTally {
    pub missing_fields: usize,
    pub decode_failures: usize,
}

impl SkipTally {
    pub fn record(&mut self, err: &RowError) {
        match err {
            RowError::MissingRequiredField { .. } => self.missing_fields += 1,
            RowError::DecodeFailure { .. } => self.decode_failures += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_fields + self.decode_failures
    }
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<OutputRecord>,
    pub skipped: SkipTally,
}

/// Runs decode, extract and reconcile over every row in order. Bad rows are skipped and
/// tallied; they never stop the batch.
pub fn process_rows(rows: Vec<RawRow>, progress: &ProgressBar) -> BatchResult {
    let mut batch = BatchResult::default();
    for (i, row) in rows.into_iter().enumerate() {
        match process_row(i + 1, row) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                batch.skipped.record(&e);
                progress.suspend(|| warn!("Skipped {}", e));
            }
        }
        progress.inc(1);
    }
    debug!("Finished batch: Records={}, Skipped(NoField)={}, Skipped(Decode)={}",
        batch.records.len(), batch.skipped.missing_fields, batch.skipped.decode_failures);
    batch
}

pub fn process_row(row_num: usize, row: RawRow) -> Result<OutputRecord, RowError> {
    let row: RawRow = row.into_iter().map(|(k, v)| (k.trim().to_string(), v)).collect();
    let record_id = row.get(ID_COLUMN).map(|s| s.trim()).unwrap_or_default();
    let encoded = row.get(COOKIE_COLUMN).map(|s| s.trim()).unwrap_or_default();
    if record_id.is_empty() || encoded.is_empty() {
        return Err(RowError::MissingRequiredField { row: row_num });
    }

    let attrs = decoder::decode(encoded);
    if attrs.is_empty() {
        return Err(RowError::DecodeFailure { row: row_num });
    }

    let page_url = attrs.get(PAGE_URL_FIELD).map(String::as_str).unwrap_or_default();
    let params = query::extract(page_url);
    Ok(OutputRecord { record_id: record_id.to_string(), fields: reconcile(&attrs, &params) })
}
