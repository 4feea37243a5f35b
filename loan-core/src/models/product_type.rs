use std::fmt;

use serde::{Deserialize, Serialize};

/// Loan variant chosen on the offer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "Overdraft Limit")]
    OverdraftLimit,
    #[serde(rename = "Term Loan")]
    TermLoan,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverdraftLimit => "Overdraft Limit",
            Self::TermLoan => "Term Loan",
        }
    }

    /// Accepts the display label or the kebab-case CLI spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Overdraft Limit" | "overdraft-limit" | "overdraft" => Some(Self::OverdraftLimit),
            "Term Loan" | "term-loan" | "term" => Some(Self::TermLoan),
            _ => None,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_labels_and_cli_spellings() {
        assert_eq!(ProductType::parse("Term Loan"), Some(ProductType::TermLoan));
        assert_eq!(ProductType::parse("term-loan"), Some(ProductType::TermLoan));
        assert_eq!(
            ProductType::parse("overdraft-limit"),
            Some(ProductType::OverdraftLimit)
        );
        assert_eq!(ProductType::parse("mortgage"), None);
    }

    #[test]
    fn serializes_as_display_label() {
        let json = serde_json::to_string(&ProductType::OverdraftLimit).unwrap();

        assert_eq!(json, "\"Overdraft Limit\"");
    }
}
