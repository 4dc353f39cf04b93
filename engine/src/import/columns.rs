// Maps loosely named CSV headers onto the three line-item fields.

const DESCRIPTION_SYNONYMS: &[&str] = &[
    "description",
    "desc",
    "item",
    "itemdescription",
    "name",
    "service",
    "product",
    "details",
];
const QUANTITY_SYNONYMS: &[&str] = &["quantity", "qty", "qnty", "count", "units", "unit", "hours"];
const PRICE_SYNONYMS: &[&str] = &["price", "rate", "unitprice", "unitcost", "cost", "amountperunit"];

// Substring fallbacks, tried keyword by keyword in this order.
const DESCRIPTION_PARTIALS: &[&str] = &["description", "desc"];
const QUANTITY_PARTIALS: &[&str] = &["quantity", "qty"];
const PRICE_PARTIALS: &[&str] = &["unitprice", "price", "rate"];

/// Raw header names resolved for one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub description: String,
    pub quantity: String,
    pub price: String,
}

/// "Unit Price", "unit_price" and "Unit-Price" all become "unitprice".
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect()
}

/// Resolves all three fields or none. Header order breaks ties.
pub fn detect_columns(headers: &[String]) -> Option<ColumnMapping> {
    let normalized: Vec<(&str, String)> = headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| (h.as_str(), normalize_header(h)))
        .collect();

    let description = resolve(&normalized, DESCRIPTION_SYNONYMS, DESCRIPTION_PARTIALS);
    let quantity = resolve(&normalized, QUANTITY_SYNONYMS, QUANTITY_PARTIALS);
    let price = resolve(&normalized, PRICE_SYNONYMS, PRICE_PARTIALS);

    match (description, quantity, price) {
        (Some(description), Some(quantity), Some(price)) => Some(ColumnMapping {
            description: description.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }),
        (description, quantity, price) => {
            tracing::debug!(
                description = description.is_some(),
                quantity = quantity.is_some(),
                price = price.is_some(),
                "Column detection failed"
            );
            None
        }
    }
}

fn resolve<'a>(normalized: &[(&'a str, String)], synonyms: &[&str], partials: &[&str]) -> Option<&'a str> {
    normalized
        .iter()
        .find(|(_, key)| synonyms.contains(&key.as_str()))
        .or_else(|| {
            partials
                .iter()
                .find_map(|needle| normalized.iter().find(|(_, key)| key.contains(needle)))
        })
        .map(|(raw, _)| *raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn mapping(d: &str, q: &str, p: &str) -> ColumnMapping {
        ColumnMapping {
            description: d.to_string(),
            quantity: q.to_string(),
            price: p.to_string(),
        }
    }

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("Unit Price"), "unitprice");
        assert_eq!(normalize_header("unit_price"), "unitprice");
        assert_eq!(normalize_header(" Unit-Price "), "unitprice");
        assert_eq!(normalize_header("Amount  Per\tUnit"), "amountperunit");
    }

    #[test]
    fn test_exact_synonyms_in_any_order() {
        let expected = mapping("Item", "Qty", "Unit Price");
        assert_eq!(detect_columns(&headers(&["Item", "Qty", "Unit Price"])), Some(expected.clone()));
        assert_eq!(detect_columns(&headers(&["Unit Price", "Item", "Qty"])), Some(expected.clone()));
        assert_eq!(detect_columns(&headers(&["Qty", "Unit Price", "Item"])), Some(expected));
    }

    #[test]
    fn test_partial_fallback() {
        let found = detect_columns(&headers(&["Service Description", "Total Qty", "Hourly Rate"]));
        assert_eq!(found, Some(mapping("Service Description", "Total Qty", "Hourly Rate")));
    }

    #[test]
    fn test_partial_price_prefers_unitprice_keyword() {
        let found = detect_columns(&headers(&["Desc", "Qty", "List Price", "Net Unit Price"]));
        assert_eq!(found.unwrap().price, "Net Unit Price");
    }

    #[test]
    fn test_exact_beats_partial() {
        // "Item Description Long" only matches partially, "Name" is exact.
        let found = detect_columns(&headers(&["Item Description Long", "Name", "Qty", "Price"]));
        assert_eq!(found.unwrap().description, "Name");
    }

    #[test]
    fn test_first_header_wins_on_ties() {
        let found = detect_columns(&headers(&["Product", "Service", "Hours", "Units", "Rate", "Cost"])).unwrap();
        assert_eq!(found, mapping("Product", "Hours", "Rate"));
    }

    #[test]
    fn test_duplicate_headers_resolve_to_first() {
        let found = detect_columns(&headers(&["Item", "qty", "qty", "Price"])).unwrap();
        assert_eq!(found.quantity, "qty");
    }

    #[test]
    fn test_missing_any_field_fails_as_a_whole() {
        assert_eq!(detect_columns(&headers(&["Item", "Qty"])), None);
        assert_eq!(detect_columns(&headers(&["Item", "Price"])), None);
        assert_eq!(detect_columns(&headers(&["Qty", "Price", "Notes"])), None);
        assert_eq!(detect_columns(&[]), None);
    }

    #[test]
    fn test_empty_headers_are_ignored() {
        assert_eq!(detect_columns(&headers(&["", "Item", "Qty", "Price"])), Some(mapping("Item", "Qty", "Price")));
    }

    #[test]
    fn test_one_header_may_serve_two_fields() {
        let found = detect_columns(&headers(&["Item", "Quantity Price"])).unwrap();
        assert_eq!(found, mapping("Item", "Quantity Price", "Quantity Price"));
    }
}
