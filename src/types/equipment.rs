//! Equipment rows and per-row validation results

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Columns
// ============================================================================

/// Required CSV columns.
///
/// Header matching is case-insensitive and order-independent; [`Column::header`]
/// is the canonical spelling used in error messages and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "Equipment Name")]
    EquipmentName,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl Column {
    /// All required columns, in canonical order.
    pub const REQUIRED: [Self; 5] = [
        Self::EquipmentName,
        Self::Type,
        Self::Flowrate,
        Self::Pressure,
        Self::Temperature,
    ];

    /// Numeric columns that must parse as finite decimals.
    pub const NUMERIC: [Self; 3] = [Self::Flowrate, Self::Pressure, Self::Temperature];

    /// Canonical header spelling.
    pub const fn header(self) -> &'static str {
        match self {
            Self::EquipmentName => "Equipment Name",
            Self::Type => "Type",
            Self::Flowrate => "Flowrate",
            Self::Pressure => "Pressure",
            Self::Temperature => "Temperature",
        }
    }

    /// Display unit for numeric columns.
    pub const fn unit(self) -> Option<&'static str> {
        match self {
            Self::Flowrate => Some("m³/h"),
            Self::Pressure => Some("bar"),
            Self::Temperature => Some("°C"),
            Self::EquipmentName | Self::Type => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One validated CSV data row.
///
/// All numeric fields are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRow {
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl EquipmentRow {
    /// Value of a numeric column, `None` for text columns.
    pub const fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Flowrate => Some(self.flowrate),
            Column::Pressure => Some(self.pressure),
            Column::Temperature => Some(self.temperature),
            Column::EquipmentName | Column::Type => None,
        }
    }
}

/// Why a numeric field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorReason {
    /// The field is blank, or absent because the row is short.
    Missing,
    /// Not a decimal number.
    NotANumber,
    /// Parsed, but NaN or infinite.
    NonFinite,
}

impl fmt::Display for RowErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing value"),
            Self::NotANumber => write!(f, "not a number"),
            Self::NonFinite => write!(f, "not a finite number"),
        }
    }
}

/// A per-row numeric coercion failure.
///
/// The row is excluded from the valid set; the upload itself still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowParseError {
    /// Zero-based index among data rows (the header is not counted).
    pub row: usize,
    /// One-based line number in the source file.
    pub line: u64,
    pub field: Column,
    pub value: String,
    pub reason: RowErrorReason,
}

impl fmt::Display for RowParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} (line {}): {} {:?} is {}",
            self.row, self.line, self.field, self.value, self.reason
        )
    }
}

/// Result of validating one uploaded CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// Valid rows, in file order.
    pub rows: Vec<EquipmentRow>,
    /// Row errors, in file order.
    pub errors: Vec<RowParseError>,
}

impl ValidationResult {
    /// Number of data rows seen, valid or not.
    pub fn rows_seen(&self) -> usize {
        let mut rejected: Vec<usize> = self.errors.iter().map(|e| e.row).collect();
        rejected.dedup();
        self.rows.len() + rejected.len()
    }
}
