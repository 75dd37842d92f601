//! JSON summary for chart widgets

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::types::{Column, Measure, SummaryStats};

/// One bar of the type distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub count: usize,
}

/// Rounded min/max of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ranges {
    pub flowrate: Range,
    pub pressure: Range,
    pub temperature: Range,
}

/// Display units for the three numeric parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    pub flowrate: String,
    pub pressure: String,
    pub temperature: String,
}

impl Default for Units {
    fn default() -> Self {
        let unit = |c: Column| c.unit().unwrap_or_default().to_string();
        Self {
            flowrate: unit(Column::Flowrate),
            pressure: unit(Column::Pressure),
            temperature: unit(Column::Temperature),
        }
    }
}

/// Chart payload: `{ totalCount, avgFlowrate, ..., typeDistribution }`.
///
/// Averages are `null` and `noData` is `true` when the upload had no valid
/// rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub total_count: usize,
    pub no_data: bool,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub ranges: Option<Ranges>,
    pub type_distribution: Vec<TypeCount>,
    pub units: Units,
}

impl ChartSummary {
    /// Build the chart payload, rounding to `precision` decimal places.
    pub fn from_summary(summary: &SummaryStats, precision: u32) -> Self {
        let round = |v: f64| round_to(v, precision);
        let range = |m: &Measure| Range {
            min: round(m.min),
            max: round(m.max),
        };

        Self {
            total_count: summary.total_count,
            no_data: !summary.has_data(),
            avg_flowrate: summary.avg_flowrate().map(round),
            avg_pressure: summary.avg_pressure().map(round),
            avg_temperature: summary.avg_temperature().map(round),
            ranges: summary.parameters.as_ref().map(|p| Ranges {
                flowrate: range(&p.flowrate),
                pressure: range(&p.pressure),
                temperature: range(&p.temperature),
            }),
            type_distribution: summary
                .type_distribution()
                .into_iter()
                .map(|(t, count)| TypeCount {
                    equipment_type: t.to_string(),
                    count,
                })
                .collect(),
            units: Units::default(),
        }
    }
}
