// Handler for CSV line-item imports
use std::path::Path;

use super::helpers::ImportGuard;
use super::InvoiceService;
use crate::error::EngineError;
use crate::import::import_table;
use crate::items::append_items;

pub async fn handle_import_csv_file(service: &InvoiceService, path: &Path) -> Result<usize, EngineError> {
    let _guard = ImportGuard::acquire(&service.importing)?;
    let bytes = tokio::fs::read(path).await?;
    import_bytes(service, &bytes).await
}

pub async fn handle_import_csv_bytes(service: &InvoiceService, bytes: &[u8]) -> Result<usize, EngineError> {
    let _guard = ImportGuard::acquire(&service.importing)?;
    import_bytes(service, bytes).await
}

// Items are appended only once the whole file validated.
async fn import_bytes(service: &InvoiceService, bytes: &[u8]) -> Result<usize, EngineError> {
    let table = service.parser.parse_reader(bytes)?;
    let imported = import_table(&table, service.messages().imported_item_fallback)?;

    let mut invoice = service.invoice.write().await;
    invoice.items = append_items(&invoice.items, &imported);
    tracing::info!(
        imported = imported.len(),
        total_items = invoice.items.len(),
        "Appended imported line items"
    );
    Ok(imported.len())
}

#[cfg(test)]
mod tests {
    use super::super::tests::create_test_service;
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_dummy_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_import_csv_file_appends_items() {
        let service = create_test_service();
        let tmp_file = create_dummy_csv("Item,Qty,Unit Price\nWidget,3,19.99\nGadget,1,5");
        let count = service.import_csv_file(tmp_file.path()).await.unwrap();
        assert_eq!(count, 2);

        let invoice = service.snapshot().await;
        assert_eq!(invoice.items.len(), 4);
        assert_eq!(invoice.items[2].description, "Widget");
        assert_eq!(invoice.items[3].description, "Gadget");
        assert!(!service.is_importing());
    }

    #[tokio::test]
    async fn test_import_updates_totals() {
        let service = create_test_service();
        service.import_csv_text("Item,Qty,Price\nExtra,2,10\n").await.unwrap();
        let totals = service.totals().await;
        assert_eq!(totals.subtotal, 2660.0);
        assert_eq!(totals.total, 3192.0);
    }

    #[tokio::test]
    async fn test_missing_columns_leaves_items_untouched() {
        let service = create_test_service();
        let before = service.snapshot().await.items;
        let result = service.import_csv_text("Item,Notes\nWidget,fragile\n").await;
        assert!(matches!(result, Err(EngineError::MissingColumns)));
        assert_eq!(service.snapshot().await.items, before);
        assert!(!service.is_importing());
    }

    #[tokio::test]
    async fn test_no_usable_rows_leaves_items_untouched() {
        let service = create_test_service();
        let result = service.import_csv_text("Item,Qty,Price\n,0,0\n").await;
        assert!(matches!(result, Err(EngineError::NoUsableRows)));
        assert_eq!(service.snapshot().await.items.len(), 2);
        let notice = service.import_notice(&result).unwrap();
        assert_eq!(notice.message, service.messages().csv_no_rows);
    }

    #[tokio::test]
    async fn test_parse_error_reports_generic_failure() {
        let service = create_test_service();
        let result = handle_import_csv_bytes(&service, b"Item,Qty,Price\n\xff,1,1\n").await;
        assert!(matches!(result, Err(EngineError::CsvSystemError { .. })));
        let notice = service.import_notice(&result).unwrap();
        assert_eq!(notice.message, service.messages().import_fail);
    }

    #[tokio::test]
    async fn test_missing_file_reports_generic_failure() {
        let service = create_test_service();
        let result = service.import_csv_file(Path::new("non_existent_file.csv")).await;
        assert!(matches!(result, Err(EngineError::IoError { .. })));
        assert!(!service.is_importing());
    }

    #[tokio::test]
    async fn test_second_import_is_suppressed_while_busy() {
        let service = create_test_service();
        let held = ImportGuard::acquire(&service.importing).unwrap();
        assert!(service.is_importing());

        let result = service.import_csv_text("Item,Qty,Price\nWidget,1,1\n").await;
        assert!(matches!(result, Err(EngineError::ImportInProgress)));
        assert!(service.import_notice(&result).is_none());
        assert_eq!(service.snapshot().await.items.len(), 2);

        drop(held);
        assert_eq!(service.import_csv_text("Item,Qty,Price\nWidget,1,1\n").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_imported_text_uses_localized_fallback() {
        let service = create_test_service();
        service.import_csv_text("Description,Qty,Price\n,2,5\n").await.unwrap();
        let invoice = service.snapshot().await;
        assert_eq!(invoice.items[2].description, "Imported item");
    }
}
