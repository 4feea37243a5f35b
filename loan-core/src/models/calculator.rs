use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Principal shown before the applicant touches the calculator.
pub const DEFAULT_PRINCIPAL: u32 = 500_000;
/// One-year term.
pub const DEFAULT_TERM_MONTHS: u32 = 12;
/// Annual rate in percent, expressed in hundredths (16.99 %).
pub const DEFAULT_RATE_BASIS_POINTS: i64 = 1699;

/// The three user-controlled calculator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCalculatorInput {
    pub principal: Decimal,
    pub term_months: u32,
    pub annual_rate_percent: Decimal,
}

impl LoanCalculatorInput {
    pub fn new(
        principal: Decimal,
        term_months: u32,
        annual_rate_percent: Decimal,
    ) -> Self {
        Self {
            principal,
            term_months,
            annual_rate_percent,
        }
    }

    /// Builds an input from raw widget numbers. Returns `None` when any value
    /// is not finite or cannot be represented as a decimal.
    pub fn from_f64(
        principal: f64,
        term_months: u32,
        annual_rate_percent: f64,
    ) -> Option<Self> {
        Some(Self {
            principal: Decimal::from_f64(principal)?,
            term_months,
            annual_rate_percent: Decimal::from_f64(annual_rate_percent)?,
        })
    }
}

impl Default for LoanCalculatorInput {
    fn default() -> Self {
        Self {
            principal: Decimal::from(DEFAULT_PRINCIPAL),
            term_months: DEFAULT_TERM_MONTHS,
            annual_rate_percent: Decimal::new(DEFAULT_RATE_BASIS_POINTS, 2),
        }
    }
}

/// Values derived from a [`LoanCalculatorInput`]. Always recomputed, never
/// edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoanCalculatorOutput {
    pub installment: Decimal,
    pub total_interest: Decimal,
    pub total_cost: Decimal,
}

impl LoanCalculatorOutput {
    pub const ZERO: Self = Self {
        installment: Decimal::ZERO,
        total_interest: Decimal::ZERO,
        total_cost: Decimal::ZERO,
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_input_is_five_lakh_for_a_year_at_16_99() {
        let input = LoanCalculatorInput::default();

        assert_eq!(input.principal, dec!(500000));
        assert_eq!(input.term_months, 12);
        assert_eq!(input.annual_rate_percent, dec!(16.99));
    }

    #[test]
    fn from_f64_rejects_non_finite_values() {
        assert!(LoanCalculatorInput::from_f64(f64::NAN, 12, 10.0).is_none());
        assert!(LoanCalculatorInput::from_f64(1000.0, 12, f64::INFINITY).is_none());
    }

    #[test]
    fn from_f64_keeps_whole_values() {
        let input = LoanCalculatorInput::from_f64(250000.0, 24, 12.0).unwrap();

        assert_eq!(input.principal, dec!(250000));
        assert_eq!(input.annual_rate_percent, dec!(12));
    }
}
