// Numeric coercion and id helpers shared by the engine and any front end.
use crate::models::CellValue;
use std::str::FromStr;
use uuid::Uuid;

/// Returns `value` when it is finite, `fallback` otherwise.
pub fn safe_number(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Best-effort conversion of a loosely-typed cell into a finite number.
///
/// Text keeps only digits, `,`, `.` and `-`; commas are thousands separators
/// and are dropped before parsing. Anything that still fails to parse, or
/// parses to a non-finite value, yields `fallback`.
pub fn parse_numeric_cell(cell: &CellValue, fallback: f64) -> f64 {
    match cell {
        CellValue::Number(n) => safe_number(*n, fallback),
        CellValue::Text(s) => parse_numeric_text(s, fallback),
        CellValue::Empty => fallback,
    }
}

pub fn parse_numeric_text(s: &str, fallback: f64) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();

    f64::from_str(&cleaned)
        .map(|n| safe_number(n, fallback))
        .unwrap_or(fallback)
}

/// Fresh opaque identifier for a line item.
pub fn create_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_with_thousands() {
        assert_eq!(parse_numeric_text("$1,234.50", 0.0), 1234.50);
        assert_eq!(parse_numeric_text("1,000,000", 0.0), 1_000_000.0);
    }

    #[test]
    fn test_parse_surrounding_symbols_and_whitespace() {
        assert_eq!(parse_numeric_text("  € 19.99 ", 0.0), 19.99);
        assert_eq!(parse_numeric_text("12 hrs", 0.0), 12.0);
    }

    #[test]
    fn test_parse_negative_and_fractional() {
        assert_eq!(parse_numeric_text("-2.7", 0.0), -2.7);
        assert_eq!(parse_numeric_text(".5", 0.0), 0.5);
    }

    #[test]
    fn test_parse_failure_returns_fallback() {
        assert_eq!(parse_numeric_text("abc", 7.0), 7.0);
        assert_eq!(parse_numeric_text("", 7.0), 7.0);
        assert_eq!(parse_numeric_text("1.2.3", 7.0), 7.0);
        assert_eq!(parse_numeric_text("-", 7.0), 7.0);
        // Letters are stripped before parsing, so "inf" never reaches the parser.
        assert_eq!(parse_numeric_text("inf", 7.0), 7.0);
    }

    #[test]
    fn test_number_cells() {
        assert_eq!(parse_numeric_cell(&CellValue::Number(3.5), 0.0), 3.5);
        assert_eq!(parse_numeric_cell(&CellValue::Number(f64::NAN), 1.0), 1.0);
        assert_eq!(parse_numeric_cell(&CellValue::Number(f64::INFINITY), 1.0), 1.0);
        assert_eq!(parse_numeric_cell(&CellValue::Empty, 2.0), 2.0);
    }

    #[test]
    fn test_huge_digit_runs_stay_finite() {
        let digits = "9".repeat(400);
        assert_eq!(parse_numeric_text(&digits, 0.0), 0.0);
    }

    #[test]
    fn test_create_id_is_unique() {
        assert_ne!(create_id(), create_id());
    }
}
