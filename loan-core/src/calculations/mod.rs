//! Loan calculation modules.
//!
//! This module provides the EMI amortization engine and the shared
//! rounding/formatting helpers used by the display layer.

pub mod amortization;
pub mod common;

pub use amortization::{AmortizationError, EmiCalculator, compute};
