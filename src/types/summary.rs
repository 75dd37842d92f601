//! Aggregated statistics for one upload

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::equipment::Column;

/// Mean and range of one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-parameter statistics. Only exists when at least one valid row was seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterStats {
    pub flowrate: Measure,
    pub pressure: Measure,
    pub temperature: Measure,
}

impl ParameterStats {
    pub const fn get(&self, column: Column) -> Option<&Measure> {
        match column {
            Column::Flowrate => Some(&self.flowrate),
            Column::Pressure => Some(&self.pressure),
            Column::Temperature => Some(&self.temperature),
            Column::EquipmentName | Column::Type => None,
        }
    }
}

/// Summary of the valid rows of one upload.
///
/// `parameters` is `None` when no valid rows exist. This is the explicit
/// "no data" marker: averages are never reported as 0 or NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_count: usize,
    pub parameters: Option<ParameterStats>,
    /// Exact tally keyed by the literal type string.
    pub type_counts: BTreeMap<String, usize>,
}

impl SummaryStats {
    pub const fn has_data(&self) -> bool {
        self.parameters.is_some()
    }

    pub fn avg_flowrate(&self) -> Option<f64> {
        self.parameters.map(|p| p.flowrate.mean)
    }

    pub fn avg_pressure(&self) -> Option<f64> {
        self.parameters.map(|p| p.pressure.mean)
    }

    pub fn avg_temperature(&self) -> Option<f64> {
        self.parameters.map(|p| p.temperature.mean)
    }

    /// Type tally sorted by count (descending), then type name.
    pub fn type_distribution(&self) -> Vec<(&str, usize)> {
        let mut dist: Vec<(&str, usize)> = self
            .type_counts
            .iter()
            .map(|(t, c)| (t.as_str(), *c))
            .collect();
        dist.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        dist
    }
}
