use shared::i18n::Messages;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV is missing a description, quantity or price column")]
    MissingColumns,

    #[error("CSV contains no usable rows")]
    NoUsableRows,

    #[error("Another import is already in progress")]
    ImportInProgress,

    #[error("Not an image file: {0}")]
    NotAnImage(String),

    #[error("File read error: {0}")]
    FileRead(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl EngineError {
    /// Message shown to the user for a failed import.
    pub fn import_notice_message(&self, messages: &Messages) -> String {
        tracing::error!("Mapping EngineError to import notice: {:?}", self);
        match self {
            EngineError::MissingColumns => messages.csv_missing_columns.to_string(),
            EngineError::NoUsableRows => messages.csv_no_rows.to_string(),
            _ => messages.import_fail.to_string(),
        }
    }

    /// Message shown to the user for a failed QR image upload.
    pub fn qr_notice_message(&self, messages: &Messages) -> String {
        tracing::error!("Mapping EngineError to QR notice: {:?}", self);
        match self {
            EngineError::NotAnImage(_) => messages.image_only_error.to_string(),
            _ => messages.qr_upload_fail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::i18n::Language;

    #[test]
    fn test_import_messages() {
        let en = Language::En.messages();
        assert_eq!(EngineError::MissingColumns.import_notice_message(en), en.csv_missing_columns);
        assert_eq!(EngineError::NoUsableRows.import_notice_message(en), en.csv_no_rows);
        let io = EngineError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.import_notice_message(en), en.import_fail);
    }

    #[test]
    fn test_qr_messages() {
        let cs = Language::Cs.messages();
        assert_eq!(
            EngineError::NotAnImage("text/plain".to_string()).qr_notice_message(cs),
            cs.image_only_error
        );
        assert_eq!(EngineError::FileRead("empty".to_string()).qr_notice_message(cs), cs.qr_upload_fail);
    }
}
