// Engine library root: CSV line-item import, totals and the invoice service.

pub mod config;
pub mod data;
pub mod error;
pub mod import;
pub mod items;
pub mod services;
pub mod totals;

pub use error::EngineError;
