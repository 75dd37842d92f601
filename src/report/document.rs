//! Downloadable report model

use super::{pdf, round_to, text, RenderError, ReportFormat};
use crate::types::{Column, UploadRecord};

const TITLE: &str = "Chemical Equipment Parameter Report";
const TYPE_COLUMN_WIDTH: usize = 32;

/// One line of a report. Back ends choose fonts per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLine {
    Title(String),
    Heading(String),
    Text(String),
    /// Fixed-width table row.
    Table(String),
    Blank,
}

/// Renderer-independent report content for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub upload_id: u64,
    pub lines: Vec<DocumentLine>,
}

impl ReportDocument {
    /// Lay out the report for `record`.
    ///
    /// Fails if the stored summary is inconsistent with the record or holds
    /// non-finite statistics.
    pub fn build(record: &UploadRecord, precision: u32) -> Result<Self, RenderError> {
        check_summary(record)?;

        let summary = &record.summary;
        let mut lines = vec![
            DocumentLine::Title(TITLE.to_string()),
            DocumentLine::Blank,
            DocumentLine::Text(format!("File: {}", record.filename)),
            DocumentLine::Text(format!("Upload ID: {}", record.id)),
            DocumentLine::Text(format!(
                "Uploaded: {}",
                record.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            DocumentLine::Text(format!("Checksum (md5): {}", record.checksum)),
            DocumentLine::Text(format!("Total equipment: {}", summary.total_count)),
            DocumentLine::Text(format!("Rejected row errors: {}", record.error_count)),
            DocumentLine::Blank,
            DocumentLine::Heading("Summary Statistics".to_string()),
        ];

        match &summary.parameters {
            None => lines.push(DocumentLine::Text("No valid data".to_string())),
            Some(params) => {
                let places = precision as usize;
                for column in Column::NUMERIC {
                    let Some(m) = params.get(column) else { continue };
                    let unit = column.unit().unwrap_or_default();
                    lines.push(DocumentLine::Text(format!(
                        "Average {column}: {:.places$} {unit} (min {:.places$}, max {:.places$})",
                        round_to(m.mean, precision),
                        round_to(m.min, precision),
                        round_to(m.max, precision),
                    )));
                }
            }
        }

        lines.push(DocumentLine::Blank);
        lines.push(DocumentLine::Heading("Equipment Type Distribution".to_string()));
        let distribution = summary.type_distribution();
        if distribution.is_empty() {
            lines.push(DocumentLine::Text("No equipment types recorded".to_string()));
        } else {
            lines.push(DocumentLine::Table(format!(
                "{:<TYPE_COLUMN_WIDTH$} {:>6}",
                "Type", "Count"
            )));
            lines.push(DocumentLine::Table(format!(
                "{} {}",
                "-".repeat(TYPE_COLUMN_WIDTH),
                "-".repeat(6)
            )));
            for (equipment_type, count) in distribution {
                lines.push(DocumentLine::Table(format!(
                    "{:<TYPE_COLUMN_WIDTH$} {count:>6}",
                    truncate(equipment_type, TYPE_COLUMN_WIDTH)
                )));
            }
        }

        Ok(Self {
            upload_id: record.id,
            lines,
        })
    }

    /// Encode the document.
    pub fn render(&self, format: ReportFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            ReportFormat::Pdf => pdf::render(self),
            ReportFormat::Txt => Ok(text::render(self).into_bytes()),
        }
    }
}

fn check_summary(record: &UploadRecord) -> Result<(), RenderError> {
    let summary = &record.summary;
    let inconsistent = |reason: String| RenderError::Inconsistent {
        id: record.id,
        reason,
    };

    if summary.total_count != record.row_count {
        return Err(inconsistent(format!(
            "summary counts {} rows, record counts {}",
            summary.total_count, record.row_count
        )));
    }
    let tallied: usize = summary.type_counts.values().sum();
    if tallied != summary.total_count {
        return Err(inconsistent(format!(
            "type counts sum to {tallied}, expected {}",
            summary.total_count
        )));
    }
    if summary.has_data() != (summary.total_count > 0) {
        return Err(inconsistent("statistics and row count disagree".to_string()));
    }

    if let Some(params) = &summary.parameters {
        for column in Column::NUMERIC {
            let Some(m) = params.get(column) else { continue };
            if ![m.mean, m.min, m.max].iter().all(|v| v.is_finite()) {
                return Err(RenderError::NonFinite {
                    id: record.id,
                    field: column.header(),
                });
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('~');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate;
    use crate::ingest::parse_str;
    use crate::types::SummaryStats;
    use chrono::{TimeZone, Utc};

    fn record(csv: &str) -> UploadRecord {
        let parsed = parse_str(csv).unwrap();
        let summary = aggregate(&parsed.rows);
        UploadRecord {
            id: 7,
            filename: "plant.csv".to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            row_count: summary.total_count,
            error_count: parsed.errors.len(),
            checksum: "abc123".to_string(),
            summary,
        }
    }

    fn texts(doc: &ReportDocument) -> Vec<&str> {
        doc.lines
            .iter()
            .filter_map(|l| match l {
                DocumentLine::Text(s) | DocumentLine::Table(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_document_contains_metadata_and_averages() {
        let rec = record(
            "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
             Pump-01,Centrifugal Pump,150.5,25.3,45.2\n\
             Sensor-02,Temp Sensor,abc,10.0,22.1\n",
        );
        let doc = ReportDocument::build(&rec, 2).unwrap();
        let lines = texts(&doc);

        assert!(lines.contains(&"File: plant.csv"));
        assert!(lines.contains(&"Uploaded: 2026-03-14 09:30:00 UTC"));
        assert!(lines.contains(&"Rejected row errors: 1"));
        assert!(lines
            .contains(&"Average Flowrate: 150.50 m³/h (min 150.50, max 150.50)"));
        assert!(lines.iter().any(|l| l.starts_with("Centrifugal Pump") && l.ends_with('1')));
    }

    #[test]
    fn test_no_data_document() {
        let rec = record("Equipment Name,Type,Flowrate,Pressure,Temperature\n");
        let doc = ReportDocument::build(&rec, 2).unwrap();
        let lines = texts(&doc);
        assert!(lines.contains(&"No valid data"));
        assert!(lines.contains(&"No equipment types recorded"));
    }

    #[test]
    fn test_inconsistent_summary_fails() {
        let mut rec = record("Equipment Name,Type,Flowrate,Pressure,Temperature\nA,Pump,1,2,3\n");
        rec.summary = SummaryStats::default();
        assert!(matches!(
            ReportDocument::build(&rec, 2),
            Err(RenderError::Inconsistent { id: 7, .. })
        ));
    }

    #[test]
    fn test_non_finite_summary_fails() {
        let mut rec = record("Equipment Name,Type,Flowrate,Pressure,Temperature\nA,Pump,1,2,3\n");
        if let Some(params) = rec.summary.parameters.as_mut() {
            params.pressure.mean = f64::NAN;
        }
        assert!(matches!(
            ReportDocument::build(&rec, 2),
            Err(RenderError::NonFinite { field: "Pressure", .. })
        ));
    }

    #[test]
    fn test_long_type_names_are_truncated() {
        let long = "x".repeat(40);
        assert_eq!(truncate(&long, 10).chars().count(), 10);
        assert!(truncate(&long, 10).ends_with('~'));
        assert_eq!(truncate("Pump", 10), "Pump");
    }
}
