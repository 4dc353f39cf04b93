use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::CellValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::EngineError;

/// One data row, keyed by header name.
pub type Row = HashMap<String, CellValue>;

#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    /// Header names in file order, trimmed.
    pub fields: Vec<String>,
    pub rows: Vec<Row>,
}

/// Header-first delimited text reader feeding the line-item importer.
pub struct DelimitedTextParser {
    delimiter: u8,
}

impl Default for DelimitedTextParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DelimitedTextParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn parse_str(&self, text: &str) -> Result<ParsedTable, EngineError> {
        self.parse_reader(text.as_bytes())
    }

    pub fn parse_path(&self, path: &Path) -> Result<ParsedTable, EngineError> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParsedTable, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // Short rows read as empty cells
            .trim(Trim::Headers)
            .from_reader(reader);

        let fields: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            if Self::is_blank_line(&record) {
                tracing::debug!(line = idx + 2, "Skipping blank CSV line");
                continue;
            }
            rows.push(Self::to_row(&fields, &record));
        }

        tracing::debug!(fields = fields.len(), rows = rows.len(), "Parsed delimited text");
        Ok(ParsedTable { fields, rows })
    }

    fn is_blank_line(record: &StringRecord) -> bool {
        record.is_empty() || (record.len() == 1 && record[0].trim().is_empty())
    }

    // The first column carrying a header name supplies that name's cell.
    fn to_row(fields: &[String], record: &StringRecord) -> Row {
        let mut row = Row::with_capacity(fields.len());
        for (pos, name) in fields.iter().enumerate() {
            let cell = match record.get(pos) {
                Some(value) => CellValue::Text(value.to_string()),
                None => CellValue::Empty,
            };
            row.entry(name.clone()).or_insert(cell);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_parse_with_trimmed_headers() {
        let table = DelimitedTextParser::default()
            .parse_str(" Item , Qty ,Unit Price\nWidget,3,19.99\n")
            .unwrap();
        assert_eq!(table.fields, vec!["Item", "Qty", "Unit Price"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["Item"], text("Widget"));
        assert_eq!(table.rows[0]["Unit Price"], text("19.99"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = DelimitedTextParser::default()
            .parse_str("Item,Qty,Price\n\nA,1,2\n\n\nB,3,4\n")
            .unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1]["Item"], text("B"));
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let table = DelimitedTextParser::default().parse_str("Item,Qty,Price\nA,1\n").unwrap();
        assert_eq!(table.rows[0]["Price"], CellValue::Empty);
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = DelimitedTextParser::default()
            .parse_str("\u{feff}Description,Qty,Price\nA,1,2\n")
            .unwrap();
        assert_eq!(table.fields[0], "Description");
    }

    #[test]
    fn test_duplicate_headers_first_column_wins() {
        let table = DelimitedTextParser::default().parse_str("Item,Qty,Qty,Price\nA,1,9,2\n").unwrap();
        assert_eq!(table.rows[0]["Qty"], text("1"));
    }

    #[test]
    fn test_custom_delimiter() {
        let table = DelimitedTextParser::new(b';').parse_str("Item;Qty;Price\nA;1;2,50\n").unwrap();
        assert_eq!(table.rows[0]["Price"], text("2,50"));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let bytes: &[u8] = b"Item,Qty,Price\nA,\xff\xfe,2\n";
        let result = DelimitedTextParser::default().parse_reader(bytes);
        assert!(matches!(result, Err(EngineError::CsvSystemError { .. })));
    }

    #[test]
    fn test_parse_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Item,Qty,Price\nA,1,2").unwrap();
        let table = DelimitedTextParser::default().parse_path(file.path()).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_parse_path_missing_file() {
        let result = DelimitedTextParser::default().parse_path(Path::new("non_existent_file.csv"));
        assert!(matches!(result, Err(EngineError::IoError { .. })));
    }
}
