// Line-item edits. Every function returns a new list; inputs are untouched.
use shared::models::LineItem;
use shared::utils::safe_number;

/// Editor changes to a single item; `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemPatch {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}

/// Whole, non-negative quantity; values past `u64::MAX` saturate.
pub fn coerce_quantity(value: f64) -> u64 {
    let whole = safe_number(value, 0.0).floor().max(0.0);
    if whole >= u64::MAX as f64 {
        tracing::warn!(value, "Quantity exceeds the supported range, capping");
    }
    whole as u64
}

pub fn coerce_price(value: f64) -> f64 {
    safe_number(value, 0.0).max(0.0)
}

pub fn add_item(items: &[LineItem], fallback_description: &str) -> Vec<LineItem> {
    let mut next = items.to_vec();
    next.push(LineItem::new(fallback_description, 1, 0.0));
    next
}

pub fn update_item(items: &[LineItem], id: &str, patch: &LineItemPatch) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| {
            if item.id != id {
                return item.clone();
            }
            LineItem {
                id: item.id.clone(),
                description: patch.description.clone().unwrap_or_else(|| item.description.clone()),
                quantity: patch.quantity.map(coerce_quantity).unwrap_or(item.quantity),
                price: patch.price.map(coerce_price).unwrap_or(item.price),
            }
        })
        .collect()
}

pub fn delete_item(items: &[LineItem], id: &str) -> Vec<LineItem> {
    items.iter().filter(|item| item.id != id).cloned().collect()
}

pub fn append_items(items: &[LineItem], imported: &[LineItem]) -> Vec<LineItem> {
    items.iter().chain(imported).cloned().collect()
}
