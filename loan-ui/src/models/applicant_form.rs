use loan_core::ApplicantProfile;
use loan_core::validation::{
    ValidationError, validate_email, validate_full_name, validate_mobile, validate_pan,
    validate_terms,
};
use serde::Deserialize;

/// Raw values of the welcome step, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicantForm {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub pan_number: String,
    pub terms_accepted: bool,
}

impl ApplicantForm {
    /// Validates the form and builds the profile.
    ///
    /// Fields are checked in on-screen order; the first failure is returned.
    /// Terms acceptance is checked last and is not part of the profile.
    pub fn validate(&self) -> Result<ApplicantProfile, ValidationError> {
        let full_name = validate_full_name(&self.full_name)?;
        let mobile = validate_mobile(&self.mobile)?;
        let email = validate_email(&self.email)?;
        let pan_number = validate_pan(&self.pan_number)?;
        validate_terms(self.terms_accepted)?;

        Ok(ApplicantProfile {
            full_name,
            mobile,
            email,
            pan_number,
        })
    }
}
