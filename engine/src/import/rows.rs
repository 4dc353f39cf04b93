use shared::models::{CellValue, LineItem};
use shared::utils::{create_id, parse_numeric_cell};

use super::columns::ColumnMapping;
use crate::data::csv_parser::Row;
use crate::error::EngineError;
use crate::items::coerce_quantity;

static EMPTY: CellValue = CellValue::Empty;

/// Turns parsed rows into validated line items, in source order.
///
/// Rows with no description, no quantity and no price are dropped. Each
/// surviving row gets a fresh id, regardless of any id column in the file.
pub fn import_rows(
    rows: &[Row],
    mapping: &ColumnMapping,
    fallback_description: &str,
) -> Result<Vec<LineItem>, EngineError> {
    let items: Vec<LineItem> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let item = import_row(row, mapping, fallback_description);
            if item.is_none() {
                tracing::debug!(row = idx + 1, "Discarding blank row");
            }
            item
        })
        .collect();

    if items.is_empty() {
        return Err(EngineError::NoUsableRows);
    }
    Ok(items)
}

fn import_row(row: &Row, mapping: &ColumnMapping, fallback_description: &str) -> Option<LineItem> {
    let description = cell(row, &mapping.description).as_text().trim().to_string();
    let quantity = parse_numeric_cell(cell(row, &mapping.quantity), 0.0);
    let price = parse_numeric_cell(cell(row, &mapping.price), 0.0);

    if description.is_empty() && quantity == 0.0 && price == 0.0 {
        return None;
    }

    Some(LineItem {
        id: create_id(),
        description: if description.is_empty() {
            fallback_description.to_string()
        } else {
            description
        },
        quantity: coerce_quantity(quantity),
        price: price.max(0.0),
    })
}

fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    row.get(column).unwrap_or(&EMPTY)
}
