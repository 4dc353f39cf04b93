// Handlers for editor field changes. Reusable fields are saved as they change.
use chrono::NaiveDate;
use shared::models::Currency;
use shared::utils::safe_number;

use super::InvoiceService;
use crate::data::persistence::{save_cz_settings, save_payment_notes, save_sender};
use crate::items::{add_item, delete_item, update_item, LineItemPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Recipient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyField {
    Name,
    Address,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    BankAccount,
    VariableSymbol,
    PaymentMethod,
    LegalFooterText,
}

pub async fn handle_add_item(service: &InvoiceService) -> String {
    let mut invoice = service.invoice.write().await;
    invoice.items = add_item(&invoice.items, service.messages().imported_item_fallback);
    invoice.items.last().map(|item| item.id.clone()).unwrap_or_default()
}

pub async fn handle_update_item(service: &InvoiceService, id: &str, patch: &LineItemPatch) -> bool {
    let mut invoice = service.invoice.write().await;
    if !invoice.items.iter().any(|item| item.id == id) {
        tracing::warn!(id, "Update for unknown line item ignored");
        return false;
    }
    invoice.items = update_item(&invoice.items, id, patch);
    true
}

pub async fn handle_delete_item(service: &InvoiceService, id: &str) -> bool {
    let mut invoice = service.invoice.write().await;
    let before = invoice.items.len();
    invoice.items = delete_item(&invoice.items, id);
    invoice.items.len() != before
}

impl InvoiceService {
    pub async fn set_tax_rate(&self, tax_rate: f64) {
        self.invoice.write().await.tax_rate = safe_number(tax_rate, 0.0);
    }

    pub async fn set_currency(&self, currency: Currency) {
        self.invoice.write().await.currency = currency;
    }

    pub async fn set_invoice_number(&self, number: impl Into<String>) {
        self.invoice.write().await.invoice_number = number.into();
    }

    pub async fn set_dates(&self, invoice_date: NaiveDate, due_date: NaiveDate) {
        let mut invoice = self.invoice.write().await;
        invoice.invoice_date = invoice_date;
        invoice.due_date = due_date;
    }

    pub async fn set_party_field(&self, party: Party, field: PartyField, value: impl Into<String>) {
        let mut invoice = self.invoice.write().await;
        let details = match party {
            Party::Sender => &mut invoice.sender_details,
            Party::Recipient => &mut invoice.recipient_details,
        };
        let target = match field {
            PartyField::Name => &mut details.name,
            PartyField::Address => &mut details.address,
            PartyField::Email => &mut details.email,
        };
        *target = value.into();

        if party == Party::Sender {
            self.persist_and_release(invoice, |store, invoice| save_sender(store, &invoice.sender_details))
                .await;
        }
    }

    pub async fn set_payment_notes(&self, notes: impl Into<String>) {
        let mut invoice = self.invoice.write().await;
        invoice.payment_notes = notes.into();
        self.persist_and_release(invoice, |store, invoice| save_payment_notes(store, &invoice.payment_notes))
            .await;
    }

    pub async fn set_payment_field(&self, field: PaymentField, value: impl Into<String>) {
        let mut invoice = self.invoice.write().await;
        let target = match field {
            PaymentField::BankAccount => &mut invoice.bank_account,
            PaymentField::VariableSymbol => &mut invoice.variable_symbol,
            PaymentField::PaymentMethod => &mut invoice.payment_method,
            PaymentField::LegalFooterText => &mut invoice.legal_footer_text,
        };
        *target = value.into();
        self.persist_and_release(invoice, save_cz_settings).await;
    }
}
