// CSV bulk import of line items: parse, detect columns, validate rows.
pub mod columns;
pub mod rows;

use shared::models::LineItem;

use crate::data::csv_parser::{DelimitedTextParser, ParsedTable};
use crate::error::EngineError;
pub use columns::{detect_columns, normalize_header, ColumnMapping};
pub use rows::import_rows;

/// Runs the full pipeline over already-read CSV text.
pub fn import_csv(
    parser: &DelimitedTextParser,
    text: &str,
    fallback_description: &str,
) -> Result<Vec<LineItem>, EngineError> {
    let table = parser.parse_str(text)?;
    import_table(&table, fallback_description)
}

pub fn import_table(table: &ParsedTable, fallback_description: &str) -> Result<Vec<LineItem>, EngineError> {
    let mapping = detect_columns(&table.fields).ok_or(EngineError::MissingColumns)?;
    tracing::info!(
        description = %mapping.description,
        quantity = %mapping.quantity,
        price = %mapping.price,
        "Resolved CSV columns"
    );
    import_rows(&table.rows, &mapping, fallback_description)
}
