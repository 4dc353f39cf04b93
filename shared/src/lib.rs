// Data models and pure helpers shared across the invoice workspace.
pub mod i18n;
pub mod models;
pub mod utils;
