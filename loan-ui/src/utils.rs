use thiserror::Error;

/// Error returned when widget text cannot be parsed as a number.
#[derive(Debug, Error)]
#[error("invalid number '{input}': {source}")]
pub struct ParseNumberError {
    input: String,
    #[source]
    source: std::num::ParseFloatError,
}

/// Normalizes input for number parsing: trims whitespace and removes commas
/// (en-IN and western grouping separators alike).
fn normalize_numeric_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses the text of a numeric field.
///
/// Handles comma grouping (e.g. `"5,00,000"`). Empty or whitespace-only input
/// is treated as 0. Logs and returns an error when the input is non-empty but
/// not a number.
pub fn parse_number(s: &str) -> Result<f64, ParseNumberError> {
    let normalized = normalize_numeric_input(s);
    if normalized.is_empty() {
        return Ok(0.0);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid number: {}", e);
        ParseNumberError {
            input: s.to_string(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_en_in_grouping() {
        assert_eq!(parse_number("5,00,000").unwrap(), 500000.0);
        assert_eq!(parse_number("12,34,567.5").unwrap(), 1234567.5);
    }

    #[test]
    fn parse_number_trims_whitespace() {
        assert_eq!(parse_number("  750000 ").unwrap(), 750000.0);
    }

    #[test]
    fn parse_number_empty_treated_as_zero() {
        assert_eq!(parse_number("").unwrap(), 0.0);
        assert_eq!(parse_number("   ").unwrap(), 0.0);
    }

    #[test]
    fn parse_number_invalid_returns_error() {
        assert!(parse_number("five lakh").is_err());
    }
}
