//! Terminal rendering of upload results

use std::fmt::Write;

use crate::api::models::{FileEntry, UploadResponse};
use crate::report::ChartSummary;

/// Widest bar in the type distribution chart.
const BAR_WIDTH: usize = 40;

/// Summary statistics block with units, e.g. `Avg. Flowrate   150.50 m³/h`.
pub fn format_summary(summary: &ChartSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<18}{}", "Total Equipment", summary.total_count);
    let rows = [
        ("Avg. Flowrate", summary.avg_flowrate, &summary.units.flowrate),
        ("Avg. Pressure", summary.avg_pressure, &summary.units.pressure),
        ("Avg. Temperature", summary.avg_temperature, &summary.units.temperature),
    ];
    for (label, value, unit) in rows {
        match value {
            Some(v) => {
                let _ = writeln!(out, "{label:<18}{v:.2} {unit}");
            }
            None => {
                let _ = writeln!(out, "{label:<18}-");
            }
        }
    }
    out
}

/// Horizontal bar chart of the type distribution.
pub fn bar_chart(summary: &ChartSummary) -> String {
    if summary.type_distribution.is_empty() {
        return "No data to display\n".to_string();
    }

    let label_width = summary
        .type_distribution
        .iter()
        .map(|t| t.equipment_type.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = summary
        .type_distribution
        .iter()
        .map(|t| t.count)
        .max()
        .unwrap_or(1)
        .max(1);

    let mut out = String::new();
    for entry in &summary.type_distribution {
        let len = (entry.count * BAR_WIDTH).div_ceil(max_count);
        let _ = writeln!(
            out,
            "{:<label_width$} | {} {}",
            entry.equipment_type,
            "#".repeat(len),
            entry.count
        );
    }
    out
}

/// Full upload report for the terminal.
pub fn format_upload(resp: &UploadResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Upload {} ({})", resp.id, resp.filename);
    out.push('\n');
    out.push_str(&format_summary(&resp.summary));
    out.push('\n');
    out.push_str("Equipment Type Distribution\n");
    out.push_str(&bar_chart(&resp.summary));

    if !resp.row_errors.is_empty() {
        let _ = writeln!(out, "\n{} row error(s):", resp.row_errors.len());
        for err in &resp.row_errors {
            let _ = writeln!(out, "  {err}");
        }
    }
    out
}

/// History table.
pub fn format_files(files: &[FileEntry]) -> String {
    if files.is_empty() {
        return "No uploads yet\n".to_string();
    }
    let mut out = String::new();
    for file in files {
        let _ = writeln!(
            out,
            "{:>6}  {}  {}",
            file.id,
            file.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            file.filename
        );
    }
    out
}
