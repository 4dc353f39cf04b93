// Best-effort key-value persistence for the reusable invoice fields.
use serde::Serialize;
use serde_json::Value;
use shared::models::{Invoice, PartyDetails};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::EngineError;

pub const SENDER_STORAGE_KEY: &str = "invoice_senderDetails_v1";
pub const PAYMENT_NOTES_STORAGE_KEY: &str = "invoice_paymentNotes_v1";
pub const CZ_SETTINGS_STORAGE_KEY: &str = "invoice_czSettings_v1";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError>;
    fn set(&self, key: &str, value: &str) -> Result<(), EngineError>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| EngineError::StorageError(format!("Memory store poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| EngineError::StorageError(format!("Memory store poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A single JSON object on disk holding every key.
///
/// A missing or corrupt file reads as an empty store; the next `set`
/// rewrites it from scratch.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> HashMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "Store file not readable, starting empty");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt store file");
                HashMap::new()
            }
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| EngineError::StorageError(format!("Store lock poisoned: {}", e)))?;
        Ok(self.read_all().remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| EngineError::StorageError(format!("Store lock poisoned: {}", e)))?;
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CzSettings<'a> {
    bank_account: &'a str,
    variable_symbol: &'a str,
    payment_method: &'a str,
    legal_footer_text: &'a str,
    qr_code_data_url: Option<&'a str>,
}

/// Applies whatever stored fields are present and well-formed onto `invoice`.
pub fn load_persisted(store: &dyn KeyValueStore, invoice: &mut Invoice) {
    if let Some(obj) = read_object(store, SENDER_STORAGE_KEY) {
        apply_party(&obj, &mut invoice.sender_details);
    }

    match store.get(PAYMENT_NOTES_STORAGE_KEY) {
        Ok(Some(notes)) => invoice.payment_notes = notes,
        Ok(None) => {}
        Err(e) => tracing::warn!(key = PAYMENT_NOTES_STORAGE_KEY, error = %e, "Failed to read stored field"),
    }

    if let Some(obj) = read_object(store, CZ_SETTINGS_STORAGE_KEY) {
        apply_string(&obj, "bankAccount", &mut invoice.bank_account);
        apply_string(&obj, "variableSymbol", &mut invoice.variable_symbol);
        apply_string(&obj, "paymentMethod", &mut invoice.payment_method);
        apply_string(&obj, "legalFooterText", &mut invoice.legal_footer_text);
        match obj.get("qrCodeDataUrl") {
            Some(Value::String(url)) => invoice.qr_code_data_url = Some(url.clone()),
            Some(Value::Null) => invoice.qr_code_data_url = None,
            _ => {}
        }
    }
}

/// Writes the reusable fields; failures are logged and otherwise ignored.
pub fn save_persisted(store: &dyn KeyValueStore, invoice: &Invoice) {
    save_sender(store, &invoice.sender_details);
    save_payment_notes(store, &invoice.payment_notes);
    save_cz_settings(store, invoice);
}

pub fn save_sender(store: &dyn KeyValueStore, sender: &PartyDetails) {
    write_json(store, SENDER_STORAGE_KEY, sender);
}

pub fn save_payment_notes(store: &dyn KeyValueStore, notes: &str) {
    if let Err(e) = store.set(PAYMENT_NOTES_STORAGE_KEY, notes) {
        tracing::warn!(key = PAYMENT_NOTES_STORAGE_KEY, error = %e, "Failed to persist field");
    }
}

pub fn save_cz_settings(store: &dyn KeyValueStore, invoice: &Invoice) {
    let settings = CzSettings {
        bank_account: &invoice.bank_account,
        variable_symbol: &invoice.variable_symbol,
        payment_method: &invoice.payment_method,
        legal_footer_text: &invoice.legal_footer_text,
        qr_code_data_url: invoice.qr_code_data_url.as_deref(),
    };
    write_json(store, CZ_SETTINGS_STORAGE_KEY, &settings);
}

fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(EngineError::from)
        .and_then(|raw| store.set(key, &raw));
    if let Err(e) = result {
        tracing::warn!(key, error = %e, "Failed to persist field");
    }
}

fn read_object(store: &dyn KeyValueStore, key: &str) -> Option<serde_json::Map<String, Value>> {
    let raw = match store.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored field");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(obj)) => Some(obj),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring corrupt stored field");
            None
        }
    }
}

fn apply_party(obj: &serde_json::Map<String, Value>, party: &mut PartyDetails) {
    apply_string(obj, "name", &mut party.name);
    apply_string(obj, "address", &mut party.address);
    apply_string(obj, "email", &mut party.email);
}

fn apply_string(obj: &serde_json::Map<String, Value>, field: &str, target: &mut String) {
    if let Some(Value::String(value)) = obj.get(field) {
        *target = value.clone();
    }
}
