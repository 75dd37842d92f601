//! Header row lookup

use csv::ByteRecord;
use std::borrow::Cow;
use std::collections::HashMap;

use super::IngestError;
use crate::types::Column;

/// Positions of the required columns, resolved once from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Indexed by `Column as usize`.
    positions: [usize; Column::REQUIRED.len()],
}

impl ColumnMap {
    /// Build the lookup from a header row.
    ///
    /// Names are decoded lossily, trimmed and lower-cased before matching.
    /// When a header repeats, the first occurrence wins. Extra columns are
    /// ignored.
    pub fn from_headers(headers: &ByteRecord) -> Result<Self, IngestError> {
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let key = normalize(&String::from_utf8_lossy(header));
            by_name.entry(key).or_insert(index);
        }

        let mut positions = [0; Column::REQUIRED.len()];
        let mut missing = Vec::new();
        for column in Column::REQUIRED {
            match by_name.get(&column.header().to_lowercase()) {
                Some(&index) => positions[column as usize] = index,
                None => missing.push(column),
            }
        }

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(IngestError::Schema { missing })
        }
    }

    /// Position of a required column.
    pub const fn index(&self, column: Column) -> usize {
        self.positions[column as usize]
    }

    /// Field of `column` in `record`, `None` if the row is too short.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD so one bad byte stays local to
    /// its field.
    pub fn field<'r>(&self, record: &'r ByteRecord, column: Column) -> Option<Cow<'r, str>> {
        record.get(self.index(column)).map(String::from_utf8_lossy)
    }
}

fn normalize(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(fields: &[&str]) -> ByteRecord {
        ByteRecord::from(fields.to_vec())
    }

    #[test]
    fn test_matches_any_case_and_order() {
        let map = ColumnMap::from_headers(&headers(&[
            "TEMPERATURE",
            "type",
            " Equipment name ",
            "pressure",
            "FlowRate",
        ]))
        .unwrap();

        assert_eq!(map.index(Column::Temperature), 0);
        assert_eq!(map.index(Column::Type), 1);
        assert_eq!(map.index(Column::EquipmentName), 2);
        assert_eq!(map.index(Column::Pressure), 3);
        assert_eq!(map.index(Column::Flowrate), 4);
    }

    #[test]
    fn test_reports_exactly_the_missing_columns() {
        let err = ColumnMap::from_headers(&headers(&["Equipment Name", "Flowrate", "Notes"]))
            .unwrap_err();
        match err {
            IngestError::Schema { missing } => {
                assert_eq!(
                    missing,
                    vec![Column::Type, Column::Pressure, Column::Temperature]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_duplicate_header_wins() {
        let map = ColumnMap::from_headers(&headers(&[
            "Equipment Name",
            "Type",
            "Flowrate",
            "Pressure",
            "Temperature",
            "flowrate",
        ]))
        .unwrap();
        assert_eq!(map.index(Column::Flowrate), 2);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let map = ColumnMap::from_headers(&headers(&[
            "\u{feff}Equipment Name",
            "Type",
            "Flowrate",
            "Pressure",
            "Temperature",
        ]))
        .unwrap();
        assert_eq!(map.index(Column::EquipmentName), 0);
    }

    #[test]
    fn test_empty_header_misses_everything() {
        let err = ColumnMap::from_headers(&ByteRecord::new()).unwrap_err();
        match err {
            IngestError::Schema { missing } => assert_eq!(missing, Column::REQUIRED.to_vec()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_decodes_invalid_utf8_lossily() {
        let map = ColumnMap::from_headers(&headers(&[
            "Equipment Name",
            "Type",
            "Flowrate",
            "Pressure",
            "Temperature",
        ]))
        .unwrap();
        let record = ByteRecord::from(vec![
            &b"R\xfchrwerk"[..],
            b"Mixer",
            b"1",
            b"2",
            b"3",
        ]);
        assert_eq!(
            map.field(&record, Column::EquipmentName).as_deref(),
            Some("R\u{fffd}hrwerk")
        );
        assert_eq!(map.field(&record, Column::Type).as_deref(), Some("Mixer"));
    }
}
