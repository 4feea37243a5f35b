//! EMI (equated monthly installment) amortization.
//!
//! Computes the fixed monthly payment that repays a principal over a number
//! of months at a fixed annual rate, together with the total interest and the
//! total amount paid.
//!
//! | Quantity      | Formula                                  |
//! |---------------|------------------------------------------|
//! | monthly rate  | `r = annual_rate_percent / 12 / 100`     |
//! | installment   | `P * r * (1 + r)^n / ((1 + r)^n - 1)`    |
//! | total cost    | `installment * n`                        |
//! | total interest| `total cost - P`                         |
//!
//! A zero principal, term or rate yields an all-zero result. Nothing in this
//! module rounds; rounding to whole rupees is a display concern (see
//! [`crate::calculations::common::round_whole`]).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use loan_core::calculations::common::round_whole;
//! use loan_core::calculations::compute;
//!
//! let output = compute(dec!(500000), 12, dec!(16.99)).unwrap();
//!
//! assert_eq!(round_whole(output.installment), dec!(45600));
//! assert_eq!(output.total_cost, output.installment * dec!(12));
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use thiserror::Error;

use crate::models::{LoanCalculatorInput, LoanCalculatorOutput};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Errors that can occur during amortization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmortizationError {
    /// An intermediate value left the representable decimal range.
    #[error("loan of {principal} over {term_months} months at {annual_rate_percent}% overflows")]
    Overflow {
        principal: Decimal,
        term_months: u32,
        annual_rate_percent: Decimal,
    },
}

/// Computes installment, total interest and total cost.
///
/// # Errors
///
/// Returns [`AmortizationError::Overflow`] when the inputs are so large that
/// `(1 + r)^n` or one of the products cannot be represented.
pub fn compute(
    principal: Decimal,
    term_months: u32,
    annual_rate_percent: Decimal,
) -> Result<LoanCalculatorOutput, AmortizationError> {
    EmiCalculator::new(LoanCalculatorInput::new(
        principal,
        term_months,
        annual_rate_percent,
    ))
    .calculate()
}

/// Calculator for a single [`LoanCalculatorInput`].
#[derive(Debug, Clone, Copy)]
pub struct EmiCalculator {
    input: LoanCalculatorInput,
}

impl EmiCalculator {
    pub fn new(input: LoanCalculatorInput) -> Self {
        Self { input }
    }

    /// Runs the full calculation.
    ///
    /// # Errors
    ///
    /// See [`compute`].
    pub fn calculate(&self) -> Result<LoanCalculatorOutput, AmortizationError> {
        let principal = self.input.principal;
        let months = self.input.term_months;
        let rate = self.monthly_rate();

        if principal.is_zero() || months == 0 || rate.is_zero() {
            return Ok(LoanCalculatorOutput::ZERO);
        }

        let installment = self
            .installment(principal, months, rate)
            .ok_or_else(|| self.overflow())?;

        let total_cost = installment
            .checked_mul(Decimal::from(months))
            .ok_or_else(|| self.overflow())?;

        let total_interest = total_cost
            .checked_sub(principal)
            .ok_or_else(|| self.overflow())?;

        Ok(LoanCalculatorOutput {
            installment,
            total_interest,
            total_cost,
        })
    }

    /// Monthly rate as a fraction: annual percent / 12 / 100.
    pub fn monthly_rate(&self) -> Decimal {
        self.input.annual_rate_percent / MONTHS_PER_YEAR / PERCENT
    }

    fn installment(
        &self,
        principal: Decimal,
        months: u32,
        rate: Decimal,
    ) -> Option<Decimal> {
        let growth = (Decimal::ONE + rate).checked_powi(i64::from(months))?;
        let denominator = growth - Decimal::ONE;

        // (1 + r)^n can collapse to exactly 1 for vanishing rates; the limit
        // of the formula as r -> 0 is a flat split of the principal.
        if denominator.is_zero() {
            return principal.checked_div(Decimal::from(months));
        }

        principal
            .checked_mul(rate)?
            .checked_mul(growth)?
            .checked_div(denominator)
    }

    fn overflow(&self) -> AmortizationError {
        AmortizationError::Overflow {
            principal: self.input.principal,
            term_months: self.input.term_months,
            annual_rate_percent: self.input.annual_rate_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_whole;

    // =========================================================================
    // reference loan
    // =========================================================================

    #[test]
    fn reference_loan_installment_rounds_to_45600() {
        let output = compute(dec!(500000), 12, dec!(16.99)).unwrap();

        assert_eq!(round_whole(output.installment), dec!(45600));
    }

    #[test]
    fn reference_loan_total_cost_is_installment_times_term() {
        let output = compute(dec!(500000), 12, dec!(16.99)).unwrap();

        assert_eq!(output.total_cost, output.installment * dec!(12));
        assert_eq!(round_whole(output.total_cost), dec!(547200));
    }

    #[test]
    fn reference_loan_total_interest_is_cost_minus_principal() {
        let output = compute(dec!(500000), 12, dec!(16.99)).unwrap();

        assert_eq!(output.total_interest, output.total_cost - dec!(500000));
        assert_eq!(round_whole(output.total_interest), dec!(47200));
    }

    #[test]
    fn installment_is_not_rounded() {
        let output = compute(dec!(500000), 12, dec!(16.99)).unwrap();

        assert!(output.installment.scale() > 2);
    }

    #[test]
    fn longer_term_lowers_installment_and_raises_interest() {
        let one_year = compute(dec!(500000), 12, dec!(16.99)).unwrap();
        let two_years = compute(dec!(500000), 24, dec!(16.99)).unwrap();

        assert!(two_years.installment < one_year.installment);
        assert!(two_years.total_interest > one_year.total_interest);
    }

    // =========================================================================
    // degenerate inputs
    // =========================================================================

    #[test]
    fn zero_rate_yields_zero_output() {
        assert_eq!(
            compute(dec!(500000), 12, dec!(0)).unwrap(),
            LoanCalculatorOutput::ZERO
        );
    }

    #[test]
    fn zero_term_yields_zero_output() {
        assert_eq!(
            compute(dec!(500000), 0, dec!(16.99)).unwrap(),
            LoanCalculatorOutput::ZERO
        );
    }

    #[test]
    fn zero_principal_yields_zero_output() {
        assert_eq!(
            compute(dec!(0), 12, dec!(16.99)).unwrap(),
            LoanCalculatorOutput::ZERO
        );
    }

    #[test]
    fn monthly_rate_divides_by_twelve_and_hundred() {
        let calc = EmiCalculator::new(LoanCalculatorInput::new(dec!(1), 1, dec!(12)));

        assert_eq!(calc.monthly_rate(), dec!(0.01));
    }

    #[test]
    fn single_month_repays_principal_plus_one_month_interest() {
        let output = compute(dec!(100000), 1, dec!(12)).unwrap();

        assert_eq!(output.installment, dec!(101000));
        assert_eq!(output.total_interest, dec!(1000));
    }

    // =========================================================================
    // overflow
    // =========================================================================

    #[test]
    fn astronomical_term_reports_overflow() {
        let result = compute(dec!(500000), u32::MAX, dec!(99));

        assert!(matches!(result, Err(AmortizationError::Overflow { .. })));
    }
}
