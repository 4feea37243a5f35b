use loan_core::BusinessProfile;
use loan_core::validation::{
    FormField, ValidationError, optional, require, validate_monthly_obligation,
};
use serde::Deserialize;

/// Raw values of the business-details step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusinessForm {
    pub trade_name: String,
    pub vintage: String,
    pub address: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub constitution_type: String,
    pub annual_turnover: String,
    pub industry_type: String,
    pub monthly_obligation: String,
    pub gst_number: String,
    pub registration_number: String,
}

impl BusinessForm {
    /// Validates required-field presence and the obligation amount.
    ///
    /// Rules:
    /// - every descriptive field is required
    /// - monthly obligation may be blank (0) but must be a number otherwise
    /// - GST and registration numbers are optional
    pub fn validate(&self) -> Result<BusinessProfile, ValidationError> {
        Ok(BusinessProfile {
            trade_name: require(FormField::TradeName, &self.trade_name)?,
            vintage: require(FormField::Vintage, &self.vintage)?,
            address: require(FormField::Address, &self.address)?,
            pincode: require(FormField::Pincode, &self.pincode)?,
            city: require(FormField::City, &self.city)?,
            state: require(FormField::State, &self.state)?,
            constitution_type: require(FormField::ConstitutionType, &self.constitution_type)?,
            annual_turnover: require(FormField::AnnualTurnover, &self.annual_turnover)?,
            industry_type: require(FormField::IndustryType, &self.industry_type)?,
            monthly_obligation: validate_monthly_obligation(&self.monthly_obligation)?,
            gst_number: optional(&self.gst_number),
            registration_number: optional(&self.registration_number),
        })
    }
}
