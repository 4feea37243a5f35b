pub mod applicant_form;
pub mod business_form;

pub use applicant_form::ApplicantForm;
pub use business_form::BusinessForm;
