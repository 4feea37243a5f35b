use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    ApplicantProfile, BusinessProfile, LoanCalculatorInput, LoanCalculatorOutput, ProductType,
};

/// Status label a freshly created record starts with.
pub const DEFAULT_STATUS: &str = "New";

/// Opaque, backend-assigned application identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calculator block of the create-application payload, in the field names
/// the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    #[serde(with = "rust_decimal::serde::float")]
    pub loan_amount: Decimal,
    pub tenure_months: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_emi: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl CalculatorSnapshot {
    pub fn new(
        input: &LoanCalculatorInput,
        output: &LoanCalculatorOutput,
    ) -> Self {
        Self {
            loan_amount: input.principal,
            tenure_months: input.term_months,
            interest_rate: input.annual_rate_percent,
            monthly_emi: output.installment,
            total_interest: output.total_interest,
            total_amount: output.total_cost,
        }
    }
}

/// JSON body of the create-application call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub pan_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    pub business: BusinessProfile,
    pub calculator: CalculatorSnapshot,
}

impl ApplicationPayload {
    pub fn new(
        applicant: &ApplicantProfile,
        business: &BusinessProfile,
        input: &LoanCalculatorInput,
        output: &LoanCalculatorOutput,
        product_type: Option<ProductType>,
    ) -> Self {
        Self {
            full_name: applicant.full_name.clone(),
            mobile: applicant.mobile.clone(),
            email: applicant.email.clone(),
            pan_number: applicant.pan_number.clone(),
            product_type,
            business: business.clone(),
            calculator: CalculatorSnapshot::new(input, output),
        }
    }
}

/// Result of a successful create-application call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApplication {
    pub application_id: ApplicationId,
}

/// Result of an attach-documents call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Stored references to uploaded documents, one per slot and a list for bank
/// statements.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReferences {
    pub identity: Option<String>,
    pub address: Option<String>,
    pub business_registration: Option<String>,
    pub utility_bill: Option<String>,
    pub bank_statements: Vec<String>,
}

/// Durable record owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    #[serde(flatten)]
    pub application: ApplicationPayload,
    pub documents: DocumentReferences,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
