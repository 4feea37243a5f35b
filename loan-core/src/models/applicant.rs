use serde::{Deserialize, Serialize};

/// Applicant identity captured on the welcome step.
///
/// Only constructed through validation (see [`crate::validation`]), so every
/// instance carries a 10-digit mobile number, a plausible email address and a
/// well-formed PAN. The PAN is stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub pan_number: String,
}
