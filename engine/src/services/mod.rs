// Services exposed by the engine.
pub mod invoice_service;

pub use invoice_service::{InvoiceService, Notice, NoticeKind};
