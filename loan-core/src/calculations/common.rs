//! Common utility functions for loan calculations.
//!
//! This module provides the display-side rounding and the en-IN currency
//! formatting shared by the calculator widgets and the CLI. The amortization
//! engine itself never rounds; only these helpers do.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used by every formatted amount.
pub const RUPEE: &str = "₹";

/// Rounds a decimal value to whole currency units using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(45600.0032)), dec!(45600));
/// assert_eq!(round_whole(dec!(45600.5)), dec!(45601));
/// assert_eq!(round_whole(dec!(-10.5)), dec!(-11));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Groups the digits of a whole number the en-IN way: the last three digits
/// form one group and every group to the left of it has two digits.
///
/// ```
/// use loan_core::calculations::common::group_en_in;
///
/// assert_eq!(group_en_in("500000"), "5,00,000");
/// assert_eq!(group_en_in("12345678"), "1,23,45,678");
/// assert_eq!(group_en_in("999"), "999");
/// ```
pub fn group_en_in(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Formats an amount as whole rupees with en-IN digit grouping, e.g.
/// `"₹ 5,00,000"`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::format_inr;
///
/// assert_eq!(format_inr(dec!(45600.0032)), "₹ 45,600");
/// assert_eq!(format_inr(dec!(0)), "₹ 0");
/// ```
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_whole(amount);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{RUPEE} {sign}{}", group_en_in(&digits))
}

/// Formats an annual rate with two decimals, e.g. `"16.99% p.a."`.
pub fn format_rate(rate_percent: Decimal) -> String {
    format!("{}% p.a.", two_decimals(rate_percent))
}

/// Rounds half-up to two decimals and pads to exactly two, e.g. `12` becomes
/// `12.00`.
pub fn two_decimals(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
