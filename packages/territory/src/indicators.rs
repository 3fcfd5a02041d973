//! Indicator table CSV reader.
//!
//! Cells are kept as raw text here. Deciding which columns are numeric
//! needs the variable catalogue and happens during the merge.

use std::collections::BTreeMap;
use std::io::Read;

use crate::code::normalize_code;
use crate::{LoadError, SourceKind};

/// One row of the indicator table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRow {
    /// Normalized territory code.
    pub code: String,
    /// Raw cell text by column name. Empty cells are omitted.
    pub cells: BTreeMap<String, String>,
}

impl IndicatorRow {
    /// Returns the raw text of a cell.
    #[must_use]
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// The indicator table with its header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorTable {
    /// Column names in file order.
    pub headers: Vec<String>,
    /// Rows in file order. Codes may repeat.
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    /// Returns `true` if the table has a column named `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Parses the indicator table.
///
/// Rows with an empty code are dropped.
///
/// # Errors
///
/// Returns [`LoadError::MissingColumn`] if `code_column` is not a
/// header, or [`LoadError::Csv`] on malformed input.
pub fn read_indicators<R: Read>(
    reader: R,
    delimiter: u8,
    code_column: &str,
) -> Result<IndicatorTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let code_idx = headers
        .iter()
        .position(|h| h == code_column)
        .ok_or_else(|| LoadError::MissingColumn {
            column: code_column.to_string(),
            kind: SourceKind::Indicators,
        })?;

    let mut rows = Vec::new();
    let mut dropped = 0_usize;

    for result in csv_reader.records() {
        let record = result?;
        let code = record.get(code_idx).map(normalize_code).unwrap_or_default();
        if code.is_empty() {
            dropped += 1;
            continue;
        }

        let cells = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();

        rows.push(IndicatorRow { code, cells });
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} indicator rows with an empty '{code_column}'");
    }

    Ok(IndicatorTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_normalized_codes() {
        let data = "CODE_EPCI,nom_EPCI,MED_SL,APL\n\
                    200000172.0,CC Alpha,21000,\n\
                    243800604,CA Beta,19500.5,3.2\n\
                    ,Orphan,1,1\n";
        let table = read_indicators(data.as_bytes(), b',', "CODE_EPCI").unwrap();

        assert_eq!(table.headers, vec!["CODE_EPCI", "nom_EPCI", "MED_SL", "APL"]);
        assert_eq!(table.rows.len(), 2, "row with empty code is dropped");
        assert_eq!(table.rows[0].code, "200000172");
        assert_eq!(table.rows[0].cell("nom_EPCI"), Some("CC Alpha"));
        assert_eq!(table.rows[0].cell("APL"), None, "empty cell is omitted");
        assert_eq!(table.rows[1].cell("MED_SL"), Some("19500.5"));
        assert!(table.has_column("APL"));
    }

    #[test]
    fn missing_code_column() {
        let data = "EPCI,MED_SL\n1,2\n";
        let err = read_indicators(data.as_bytes(), b',', "CODE_EPCI").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "CODE_EPCI"));
    }

    #[test]
    fn semicolon_delimiter() {
        let data = "CODE_EPCI;MED_SL\n1;2\n";
        let table = read_indicators(data.as_bytes(), b';', "CODE_EPCI").unwrap();
        assert_eq!(table.rows[0].cell("MED_SL"), Some("2"));
    }
}
