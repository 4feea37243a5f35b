//! Field-level validation rules for the intake forms.
//!
//! Rules stop at the first failing field and carry a message meant to be
//! shown as-is, so the applicant knows exactly what to correct.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("mobile pattern is valid"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern is valid"));

/// Every user-editable field the wizard validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    Mobile,
    Email,
    PanNumber,
    TermsAccepted,
    TradeName,
    Vintage,
    Address,
    Pincode,
    City,
    State,
    ConstitutionType,
    AnnualTurnover,
    IndustryType,
    MonthlyObligation,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Mobile => "Mobile number",
            Self::Email => "Email address",
            Self::PanNumber => "PAN card number",
            Self::TermsAccepted => "Terms & Conditions",
            Self::TradeName => "Trade name",
            Self::Vintage => "Business vintage",
            Self::Address => "Business address",
            Self::Pincode => "Pincode",
            Self::City => "City",
            Self::State => "State",
            Self::ConstitutionType => "Constitution type",
            Self::AnnualTurnover => "Annual turnover",
            Self::IndustryType => "Industry type",
            Self::MonthlyObligation => "Monthly obligation",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Malformed user input. Blocks the step transition that triggered it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: FormField,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        field: FormField,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: FormField) -> Self {
        Self::new(field, format!("{} is required.", field.label()))
    }
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// PAN: five letters, four digits, one letter. Case-insensitive.
pub fn is_valid_pan(pan: &str) -> bool {
    PAN_RE.is_match(pan)
}

/// Trims `value` and fails with a "required" error when nothing is left.
pub fn require(
    field: FormField,
    value: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed.to_string())
}

/// Trims `value`; blank becomes `None`.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn validate_full_name(value: &str) -> Result<String, ValidationError> {
    require(FormField::FullName, value)
        .map_err(|_| ValidationError::new(FormField::FullName, "Please enter your full name."))
}

pub fn validate_mobile(value: &str) -> Result<String, ValidationError> {
    let mobile = value.trim();
    if !is_valid_mobile(mobile) {
        return Err(ValidationError::new(
            FormField::Mobile,
            "Please enter a valid 10-digit mobile number.",
        ));
    }
    Ok(mobile.to_string())
}

pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let email = value.trim();
    if !is_valid_email(email) {
        return Err(ValidationError::new(
            FormField::Email,
            "Please enter a valid email address.",
        ));
    }
    Ok(email.to_string())
}

/// Returns the PAN upper-cased.
pub fn validate_pan(value: &str) -> Result<String, ValidationError> {
    let pan = value.trim();
    if !is_valid_pan(pan) {
        return Err(ValidationError::new(
            FormField::PanNumber,
            "Please enter a valid PAN card number.",
        ));
    }
    Ok(pan.to_ascii_uppercase())
}

pub fn validate_terms(accepted: bool) -> Result<(), ValidationError> {
    if !accepted {
        return Err(ValidationError::new(
            FormField::TermsAccepted,
            "Please agree to the Terms & Conditions.",
        ));
    }
    Ok(())
}

/// Blank means no existing obligation. Grouping commas are ignored.
pub fn validate_monthly_obligation(value: &str) -> Result<Decimal, ValidationError> {
    let normalized = value.trim().replace(',', "");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let amount: Decimal = normalized.parse().map_err(|_| {
        ValidationError::new(
            FormField::MonthlyObligation,
            "Monthly obligation must be a number.",
        )
    })?;

    if amount.is_sign_negative() {
        return Err(ValidationError::new(
            FormField::MonthlyObligation,
            "Monthly obligation cannot be negative.",
        ));
    }

    Ok(amount)
}
