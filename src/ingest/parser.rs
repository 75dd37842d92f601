//! Row parsing and numeric coercion

use csv::{ByteRecord, ReaderBuilder, Trim};
use std::io::Read;
use tracing::debug;

use super::{ColumnMap, IngestError};
use crate::types::{Column, EquipmentRow, RowErrorReason, RowParseError, ValidationResult};

/// Parse CSV text into valid rows plus row errors.
pub fn parse_str(text: &str) -> Result<ValidationResult, IngestError> {
    parse_reader(text.as_bytes())
}

/// Parse CSV from any reader into valid rows plus row errors.
///
/// A header row is required. Missing required columns fail with
/// [`IngestError::Schema`]. A header with no data rows is a valid, empty
/// result. Text is decoded per field, so invalid UTF-8 never fails the
/// whole upload.
pub fn parse_reader<R: Read>(reader: R) -> Result<ValidationResult, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.byte_headers()?)?;
    let mut result = ValidationResult::default();

    for (row, record) in csv_reader.byte_records().enumerate() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        match parse_record(&columns, &record, row, line) {
            Ok(parsed) => result.rows.push(parsed),
            Err(mut errors) => {
                debug!(row, line, errors = errors.len(), "Rejected CSV row");
                result.errors.append(&mut errors);
            }
        }
    }

    debug!(
        valid = result.rows.len(),
        errors = result.errors.len(),
        "Parsed CSV upload"
    );
    Ok(result)
}

/// Validate one record. Every offending numeric field gets its own entry.
fn parse_record(
    columns: &ColumnMap,
    record: &ByteRecord,
    row: usize,
    line: u64,
) -> Result<EquipmentRow, Vec<RowParseError>> {
    let mut values = [0.0_f64; Column::NUMERIC.len()];
    let mut errors = Vec::new();

    for (slot, column) in Column::NUMERIC.into_iter().enumerate() {
        let raw = columns.field(record, column);
        match parse_number(raw.as_deref()) {
            Ok(value) => values[slot] = value,
            Err(reason) => errors.push(RowParseError {
                row,
                line,
                field: column,
                value: raw.map(|v| v.into_owned()).unwrap_or_default(),
                reason,
            }),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let [flowrate, pressure, temperature] = values;
    Ok(EquipmentRow {
        name: columns
            .field(record, Column::EquipmentName)
            .map(|v| v.into_owned())
            .unwrap_or_default(),
        equipment_type: columns
            .field(record, Column::Type)
            .map(|v| v.into_owned())
            .unwrap_or_default(),
        flowrate,
        pressure,
        temperature,
    })
}

/// Decimal number, integer or floating point, optional sign. Must be finite.
fn parse_number(raw: Option<&str>) -> Result<f64, RowErrorReason> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Err(RowErrorReason::Missing),
    };
    let value: f64 = raw.parse().map_err(|_| RowErrorReason::NotANumber)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RowErrorReason::NonFinite)
    }
}
