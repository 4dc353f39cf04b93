// engine/src/services/invoice_service/mod.rs
// InvoiceService owns the in-memory invoice and dispatches editor actions to
// the sibling handler modules.

use chrono::{Duration, NaiveDate};
use shared::i18n::{Language, Messages};
use shared::models::{Invoice, Totals};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};

use crate::config::settings::EngineSettings;
use crate::data::csv_parser::DelimitedTextParser;
use crate::data::persistence::{load_persisted, KeyValueStore};
use crate::error::EngineError;
use crate::items::LineItemPatch;
use crate::totals::compute_totals;

pub mod edit_invoice;
pub mod helpers;
pub mod import_csv;
pub mod upload_qr;

pub use edit_invoice::{Party, PartyField, PaymentField};
pub use helpers::{Notice, NoticeKind};

pub struct InvoiceService {
    invoice: Arc<RwLock<Invoice>>,
    store: Arc<dyn KeyValueStore>,
    settings: EngineSettings,
    parser: DelimitedTextParser,
    importing: AtomicBool,
    language: std::sync::RwLock<Language>,
    persist_order: Mutex<()>,
}

impl InvoiceService {
    pub fn new(invoice: Invoice, store: Arc<dyn KeyValueStore>, settings: EngineSettings) -> Result<Self, EngineError> {
        let parser = DelimitedTextParser::new(settings.delimiter()?);
        Ok(InvoiceService {
            invoice: Arc::new(RwLock::new(invoice)),
            store,
            language: std::sync::RwLock::new(settings.language),
            settings,
            parser,
            importing: AtomicBool::new(false),
            persist_order: Mutex::new(()),
        })
    }

    /// Starter invoice with the stored reusable fields applied on top.
    pub fn open(store: Arc<dyn KeyValueStore>, settings: EngineSettings, today: NaiveDate) -> Result<Self, EngineError> {
        let mut invoice = Invoice::placeholder(today);
        invoice.tax_rate = settings.default_tax_rate;
        invoice.currency = settings.currency;
        load_persisted(store.as_ref(), &mut invoice);
        tracing::info!(
            sender = %invoice.sender_details.name,
            items = invoice.items.len(),
            "Opened invoice with persisted fields"
        );
        Self::new(invoice, store, settings)
    }

    pub fn language(&self) -> Language {
        self.language.read().map(|l| *l).unwrap_or_default()
    }

    pub fn set_language(&self, language: Language) {
        if let Ok(mut current) = self.language.write() {
            *current = language;
        }
    }

    pub fn messages(&self) -> &'static Messages {
        self.language().messages()
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::milliseconds(self.settings.notice_duration_ms as i64)
    }

    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Invoice {
        self.invoice.read().await.clone()
    }

    /// Recomputed on every call from the current items and tax rate.
    pub async fn totals(&self) -> Totals {
        let invoice = self.invoice.read().await;
        compute_totals(&invoice.items, invoice.tax_rate)
    }

    /// Releases the edit lock, then runs `save` on a blocking thread against a
    /// snapshot. Saves run in the order their edits were made.
    async fn persist_and_release(
        &self,
        invoice: RwLockWriteGuard<'_, Invoice>,
        save: fn(&dyn KeyValueStore, &Invoice),
    ) {
        let snapshot = invoice.clone();
        let _order = self.persist_order.lock().await;
        drop(invoice);

        let store = Arc::clone(&self.store);
        if let Err(e) = tokio::task::spawn_blocking(move || save(store.as_ref(), &snapshot)).await {
            tracing::warn!(error = %e, "Persist task failed");
        }
    }

    pub async fn import_csv_text(&self, text: &str) -> Result<usize, EngineError> {
        tracing::info!(bytes = text.len(), "Received CSV text import, dispatching to handler.");
        import_csv::handle_import_csv_bytes(self, text.as_bytes()).await
    }

    pub async fn import_csv_file(&self, path: &Path) -> Result<usize, EngineError> {
        tracing::info!(path = %path.display(), "Received CSV file import, dispatching to handler.");
        import_csv::handle_import_csv_file(self, path).await
    }

    /// Maps an import outcome to the notice shown to the user; a suppressed
    /// second import produces none.
    pub fn import_notice(&self, result: &Result<usize, EngineError>) -> Option<Notice> {
        let messages = self.messages();
        match result {
            Ok(count) => Some(Notice::success(messages.import_success(*count), self.notice_duration())),
            Err(EngineError::ImportInProgress) => None,
            Err(e) => Some(Notice::error(e.import_notice_message(messages), self.notice_duration())),
        }
    }

    pub async fn upload_qr_image(&self, mime_type: &str, bytes: &[u8]) -> Result<(), EngineError> {
        tracing::info!(mime_type, bytes = bytes.len(), "Received QR image upload, dispatching to handler.");
        upload_qr::handle_upload_qr_image(self, mime_type, bytes).await
    }

    pub async fn upload_qr_file(&self, path: &Path, mime_type: &str) -> Result<(), EngineError> {
        tracing::info!(path = %path.display(), mime_type, "Received QR file upload, dispatching to handler.");
        upload_qr::handle_upload_qr_file(self, path, mime_type).await
    }

    pub fn qr_notice(&self, result: &Result<(), EngineError>) -> Notice {
        let messages = self.messages();
        match result {
            Ok(()) => Notice::success(messages.qr_upload_success, self.notice_duration()),
            Err(e) => Notice::error(e.qr_notice_message(messages), self.notice_duration()),
        }
    }

    pub async fn add_item(&self) -> String {
        edit_invoice::handle_add_item(self).await
    }

    pub async fn update_item(&self, id: &str, patch: LineItemPatch) -> bool {
        tracing::debug!(id, ?patch, "Updating line item");
        edit_invoice::handle_update_item(self, id, &patch).await
    }

    pub async fn delete_item(&self, id: &str) -> bool {
        tracing::debug!(id, "Deleting line item");
        edit_invoice::handle_delete_item(self, id).await
    }
}
