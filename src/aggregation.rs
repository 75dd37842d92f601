//! Summary statistics over validated rows
//!
//! Means are plain arithmetic means, ranges come from `statrs`; type counts
//! are an exact tally keyed by the literal type string, with no case folding.

use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use crate::types::{Column, EquipmentRow, Measure, ParameterStats, SummaryStats};

/// Reduce valid rows to a [`SummaryStats`].
///
/// Zero rows produce `parameters: None` rather than zeros or NaN.
pub fn aggregate(rows: &[EquipmentRow]) -> SummaryStats {
    let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        *type_counts.entry(row.equipment_type.clone()).or_default() += 1;
    }

    let parameters = if rows.is_empty() {
        None
    } else {
        Some(ParameterStats {
            flowrate: measure(rows, Column::Flowrate),
            pressure: measure(rows, Column::Pressure),
            temperature: measure(rows, Column::Temperature),
        })
    };

    SummaryStats {
        total_count: rows.len(),
        parameters,
        type_counts,
    }
}

/// Mean and range of one numeric column. `rows` must be non-empty.
fn measure(rows: &[EquipmentRow], column: Column) -> Measure {
    let values: Vec<f64> = rows.iter().filter_map(|r| r.value(column)).collect();
    let min = Statistics::min(&values);
    let max = Statistics::max(&values);
    Measure {
        mean: finite_mean(&values, min, max),
        min,
        max,
    }
}

/// Arithmetic mean that stays finite for any finite input.
///
/// Falls back to summing `v / n` when the plain sum overflows. The result is
/// clamped to `[min, max]`, where every mean must lie.
fn finite_mean(values: &[f64], min: f64, max: f64) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let mean = if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum::<f64>()
    };
    mean.clamp(min, max)
}
