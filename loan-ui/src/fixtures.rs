//! Shared values for unit tests.

use loan_core::{
    ApplicantProfile, ApplicationPayload, BusinessProfile, LoanCalculatorInput,
    LoanCalculatorOutput, ProductType,
};
use rust_decimal::Decimal;

pub fn sample_applicant() -> ApplicantProfile {
    ApplicantProfile {
        full_name: "Asha Verma".to_string(),
        mobile: "9876543210".to_string(),
        email: "asha@verma.in".to_string(),
        pan_number: "ABCDE1234F".to_string(),
    }
}

pub fn sample_business() -> BusinessProfile {
    BusinessProfile {
        trade_name: "Verma Textiles".to_string(),
        vintage: "3-5 years".to_string(),
        address: "12 Ring Road".to_string(),
        pincode: "110001".to_string(),
        city: "New Delhi".to_string(),
        state: "Delhi".to_string(),
        constitution_type: "Proprietorship".to_string(),
        annual_turnover: "50L-1Cr".to_string(),
        industry_type: "Manufacturing".to_string(),
        monthly_obligation: Decimal::from(15000),
        gst_number: None,
        registration_number: None,
    }
}

pub fn sample_payload() -> ApplicationPayload {
    ApplicationPayload::new(
        &sample_applicant(),
        &sample_business(),
        &LoanCalculatorInput::default(),
        &LoanCalculatorOutput::ZERO,
        Some(ProductType::TermLoan),
    )
}
