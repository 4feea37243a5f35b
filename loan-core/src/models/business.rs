use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business details captured on the second wizard step.
///
/// Values are free-form labels (turnover bracket, vintage, industry) chosen
/// from the form's drop-downs; only presence is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub trade_name: String,
    pub vintage: String,
    pub address: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub constitution_type: String,
    pub annual_turnover: String,
    pub industry_type: String,

    /// Existing monthly EMIs and card payments; zero when left blank.
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_obligation: Decimal,

    pub gst_number: Option<String>,
    pub registration_number: Option<String>,
}
