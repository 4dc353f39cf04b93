// Handler for the QR payment image shown on the invoice
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;

use super::InvoiceService;
use crate::data::persistence::save_cz_settings;
use crate::error::EngineError;

fn ensure_image(mime_type: &str) -> Result<(), EngineError> {
    if mime_type.starts_with("image/") {
        Ok(())
    } else {
        Err(EngineError::NotAnImage(mime_type.to_string()))
    }
}

pub async fn handle_upload_qr_file(service: &InvoiceService, path: &Path, mime_type: &str) -> Result<(), EngineError> {
    // Rejected before any read attempt.
    ensure_image(mime_type)?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EngineError::FileRead(format!("Failed to read '{}': {}", path.display(), e)))?;
    handle_upload_qr_image(service, mime_type, &bytes).await
}

/// Stores the image as a data URL; the previous image stays on any failure.
pub async fn handle_upload_qr_image(service: &InvoiceService, mime_type: &str, bytes: &[u8]) -> Result<(), EngineError> {
    ensure_image(mime_type)?;
    if bytes.is_empty() {
        return Err(EngineError::FileRead("Image file is empty".to_string()));
    }

    let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
    let mut invoice = service.invoice.write().await;
    invoice.qr_code_data_url = Some(data_url);
    service.persist_and_release(invoice, save_cz_settings).await;
    tracing::info!(mime_type, bytes = bytes.len(), "QR image set");
    Ok(())
}

impl InvoiceService {
    pub async fn clear_qr_image(&self) {
        let mut invoice = self.invoice.write().await;
        invoice.qr_code_data_url = None;
        self.persist_and_release(invoice, save_cz_settings).await;
    }
}
