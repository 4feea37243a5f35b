mod applicant;
mod application;
mod business;
mod calculator;
mod documents;
mod product_type;

pub use applicant::ApplicantProfile;
pub use application::{
    ApplicationId, ApplicationPayload, ApplicationRecord, AttachOutcome, CalculatorSnapshot,
    CreatedApplication, DEFAULT_STATUS, DocumentReferences,
};
pub use business::BusinessProfile;
pub use calculator::{
    DEFAULT_PRINCIPAL, DEFAULT_RATE_BASIS_POINTS, DEFAULT_TERM_MONTHS, LoanCalculatorInput,
    LoanCalculatorOutput,
};
pub use documents::{
    APPLICATION_ID_FIELD, BANK_STATEMENT_FIELD, DocumentFile, DocumentSet, DocumentSlot,
};
pub use product_type::ProductType;
