// Billing totals derived from the current line items and tax rate.
use shared::models::{LineItem, Totals};
use shared::utils::safe_number;

/// Pure derivation; nothing is cached, so results always match the inputs.
///
/// Any figure that overflows to a non-finite value is reported as 0.
pub fn compute_totals(items: &[LineItem], tax_rate: f64) -> Totals {
    let subtotal = safe_number(
        items
            .iter()
            .map(|item| safe_number(item.quantity as f64, 0.0) * safe_number(item.price, 0.0))
            .sum(),
        0.0,
    );
    let tax_amount = safe_number(subtotal * (safe_number(tax_rate, 0.0) / 100.0), 0.0);

    Totals {
        subtotal,
        tax_amount,
        total: safe_number(subtotal + tax_amount, 0.0),
    }
}
