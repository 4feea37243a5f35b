//! The wizard session.
//!
//! One [`LoanSession`] exists per applicant visit. It owns the validated
//! profiles, the calculator, the identifier slot and both halves of the
//! submission protocol, and it walks the four wizard steps:
//!
//! | Step | Title            | Leaves via                     |
//! |------|------------------|--------------------------------|
//! | 1    | Welcome          | [`LoanSession::capture_applicant`] |
//! | 2    | Business Details | [`LoanSession::capture_business`], [`LoanSession::back`] |
//! | 3    | Loan Offer       | [`LoanSession::submit`]        |
//! | 4    | Completed        | [`LoanSession::restart`]       |
//!
//! Documents can be uploaded from step 4 only.

use std::fmt;
use std::sync::Arc;

use loan_core::validation::ValidationError;
use loan_core::{
    ApplicantProfile, ApplicationId, ApplicationPayload, BackendClient, BusinessProfile,
    DocumentSet, ProductType,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::calculator_state::CalculatorState;
use crate::config::TimeoutConfig;
use crate::models::{ApplicantForm, BusinessForm};
use crate::submission::{ApplicationIdSlot, ApplicationSubmissionFlow, SubmissionError};
use crate::upload::{DocumentUploadCoordinator, UploadError, UploadOutcome};

/// Shown on the completion view when the applicant left their name blank.
pub const ANONYMOUS_NAME: &str = "there";

const STEP_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Welcome,
    BusinessDetails,
    LoanOffer,
    Completed,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::Welcome => 1,
            Self::BusinessDetails => 2,
            Self::LoanOffer => 3,
            Self::Completed => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::BusinessDetails => "Business Details",
            Self::LoanOffer => "Loan Offer",
            Self::Completed => "Completed",
        }
    }

    /// Width of the progress bar.
    pub fn progress_percent(&self) -> u8 {
        self.number() * 100 / STEP_COUNT
    }
}

impl fmt::Display for WizardStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Step {} of {STEP_COUNT} – {}", self.number(), self.title())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("cannot {action} on {step}")]
    WrongStep {
        step: WizardStep,
        action: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub struct LoanSession {
    client: Arc<dyn BackendClient>,
    timeouts: TimeoutConfig,
    step: WizardStep,
    applicant: Option<ApplicantProfile>,
    business: Option<BusinessProfile>,
    product_type: Option<ProductType>,
    /// Payload sent by [`Self::submit`]; reused if the upload has to create.
    submitted: Option<ApplicationPayload>,
    calculator: CalculatorState,
    submission: ApplicationSubmissionFlow,
    upload: DocumentUploadCoordinator,
}

impl LoanSession {
    pub fn new(
        client: Arc<dyn BackendClient>,
        timeouts: TimeoutConfig,
    ) -> Self {
        let slot = ApplicationIdSlot::new();
        let submission =
            ApplicationSubmissionFlow::new(Arc::clone(&client), slot.clone(), timeouts.create());
        let upload = DocumentUploadCoordinator::new(
            Arc::clone(&client),
            slot,
            timeouts.create(),
            timeouts.upload(),
        );

        Self {
            client,
            timeouts,
            step: WizardStep::Welcome,
            applicant: None,
            business: None,
            product_type: None,
            submitted: None,
            calculator: CalculatorState::new(),
            submission,
            upload,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn applicant(&self) -> Option<&ApplicantProfile> {
        self.applicant.as_ref()
    }

    pub fn business(&self) -> Option<&BusinessProfile> {
        self.business.as_ref()
    }

    pub fn product_type(&self) -> Option<ProductType> {
        self.product_type
    }

    pub fn calculator(&self) -> &CalculatorState {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut CalculatorState {
        &mut self.calculator
    }

    pub fn submission(&self) -> &ApplicationSubmissionFlow {
        &self.submission
    }

    pub fn upload(&self) -> &DocumentUploadCoordinator {
        &self.upload
    }

    pub fn application_id(&self) -> Option<ApplicationId> {
        self.submission.slot().get()
    }

    /// Frame tick for the calculator.
    pub fn on_frame(&mut self) -> bool {
        self.calculator.on_frame()
    }

    /// Step 1 → 2.
    pub fn capture_applicant(
        &mut self,
        form: &ApplicantForm,
    ) -> Result<&ApplicantProfile, WizardError> {
        self.expect_step(WizardStep::Welcome, "capture applicant details")?;
        let profile = form.validate()?;
        debug!(name = %profile.full_name, "applicant captured");
        self.step = WizardStep::BusinessDetails;
        let profile: &ApplicantProfile = self.applicant.insert(profile);
        Ok(profile)
    }

    /// Step 2 → 3.
    pub fn capture_business(
        &mut self,
        form: &BusinessForm,
    ) -> Result<&BusinessProfile, WizardError> {
        self.expect_step(WizardStep::BusinessDetails, "capture business details")?;
        let profile = form.validate()?;
        debug!(trade_name = %profile.trade_name, "business captured");
        self.step = WizardStep::LoanOffer;
        let profile: &BusinessProfile = self.business.insert(profile);
        Ok(profile)
    }

    /// Step 2 → 1. The applicant profile is kept until it is captured again.
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::BusinessDetails, "go back")?;
        self.step = WizardStep::Welcome;
        Ok(())
    }

    /// Step 3 → 4. Moves to the completion view immediately and starts the
    /// background create; the returned handle resolves to its result.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(
        &mut self,
        product_type: ProductType,
    ) -> Result<Option<JoinHandle<Result<ApplicationId, SubmissionError>>>, WizardError> {
        self.expect_step(WizardStep::LoanOffer, "submit the application")?;
        self.calculator.flush();
        let payload = self.payload(product_type)?;

        self.product_type = Some(product_type);
        self.submitted = Some(payload.clone());
        self.step = WizardStep::Completed;
        info!(%product_type, "application submitted");

        Ok(self.submission.trigger(payload))
    }

    /// Uploads documents for this session's application. If the background
    /// create has not produced an identifier, the application is created
    /// from the submitted payload first; calculator changes made after
    /// [`Self::submit`] are not sent.
    pub async fn upload_documents(
        &self,
        documents: &DocumentSet,
    ) -> Result<UploadOutcome, WizardError> {
        self.expect_step(WizardStep::Completed, "upload documents")?;
        let Some(submitted) = &self.submitted else {
            return Err(WizardError::WrongStep {
                step: self.step,
                action: "upload documents",
            });
        };
        Ok(self.upload.submit(documents, submitted).await?)
    }

    /// Name for the thank-you message.
    pub fn thank_you_name(&self) -> &str {
        self.applicant
            .as_ref()
            .map(|a| a.full_name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_NAME)
    }

    /// Discards everything and starts over at step 1. A background create
    /// still running for the old session can only write to the old slot.
    pub fn restart(&mut self) {
        info!(step = %self.step, "session restarted");
        *self = Self::new(Arc::clone(&self.client), self.timeouts.clone());
    }

    fn expect_step(
        &self,
        expected: WizardStep,
        action: &'static str,
    ) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                step: self.step,
                action,
            })
        }
    }

    fn payload(
        &self,
        product_type: ProductType,
    ) -> Result<ApplicationPayload, WizardError> {
        let (Some(applicant), Some(business)) = (&self.applicant, &self.business) else {
            return Err(WizardError::WrongStep {
                step: self.step,
                action: "build the application",
            });
        };
        Ok(ApplicationPayload::new(
            applicant,
            business,
            &self.calculator.input(),
            &self.calculator.output(),
            Some(product_type),
        ))
    }
}
