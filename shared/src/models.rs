use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::create_id;

/// One billable row on an invoice.
///
/// `quantity` and `price` are always finite and non-negative; every
/// constructor and mutation in the engine coerces its inputs before they
/// land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub quantity: u64,
    pub price: f64,
}

impl LineItem {
    /// Builds an item with a freshly generated id.
    pub fn new(description: impl Into<String>, quantity: u64, price: f64) -> Self {
        Self {
            id: create_id(),
            description: description.into(),
            quantity,
            price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Raw cell content handed over by the delimited-text parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Textual form of the cell; numbers use their shortest display form.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::String(s) => CellValue::Text(s),
            serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            other => CellValue::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            _ => Err(format!("Unsupported currency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyDetails {
    pub name: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub sender_details: PartyDetails,
    pub recipient_details: PartyDetails,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub invoice_number: String,
    pub currency: Currency,
    /// Percent, fractional allowed, not bounded.
    pub tax_rate: f64,
    pub payment_notes: String,
    pub bank_account: String,
    pub variable_symbol: String,
    pub payment_method: String,
    pub legal_footer_text: String,
    pub qr_code_data_url: Option<String>,
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Starter invoice shown before the user has typed anything.
    pub fn placeholder(today: NaiveDate) -> Self {
        Self {
            sender_details: PartyDetails {
                name: "Acme Studio LLC".to_string(),
                address: "123 Market Street\nSan Francisco, CA 94103\nUnited States".to_string(),
                email: "billing@acme.studio".to_string(),
            },
            recipient_details: PartyDetails {
                name: "Client Company".to_string(),
                address: "500 King’s Road\nLondon SW10\nUnited Kingdom".to_string(),
                email: "accounts@client.co".to_string(),
            },
            invoice_date: today,
            due_date: today + Duration::days(14),
            invoice_number: "INV-0001".to_string(),
            currency: Currency::USD,
            tax_rate: 20.0,
            payment_notes: "Bank Name: Chase\nAccount: 123456789\nRouting: 987654321\nReference: INV-0001"
                .to_string(),
            bank_account: "123456789/0800".to_string(),
            variable_symbol: "202506".to_string(),
            payment_method: "Bankovní převod".to_string(),
            legal_footer_text: "Fyzická osoba zapsaná v živnostenském rejstříku.".to_string(),
            qr_code_data_url: None,
            items: vec![
                LineItem {
                    id: "item_1".to_string(),
                    description: "Design & UI work".to_string(),
                    quantity: 8,
                    price: 120.0,
                },
                LineItem {
                    id: "item_2".to_string(),
                    description: "Frontend implementation".to_string(),
                    quantity: 12,
                    price: 140.0,
                },
            ],
        }
    }
}
