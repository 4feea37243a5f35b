//! Headless drivers behind the CLI commands.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use loan_backend_memory::MemoryBackendFactory;
use loan_client_http::HttpBackendFactory;
use loan_core::client::{BackendRegistry, ClientConfig};
use loan_core::{ApplicationId, BackendClient, ProductType};
use tracing::{debug, info, warn};

use crate::calculator_state::CalculatorState;
use crate::config::TimeoutConfig;
use crate::profile::{ApplicationProfile, LoanSettings};
use crate::session::LoanSession;
use crate::upload::UploadOutcome;

/// Build a registry with every backend that ships with the workspace.
pub fn build_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(Box::new(HttpBackendFactory));
    registry.register(Box::new(MemoryBackendFactory::new()));
    registry
}

pub async fn connect(
    registry: &BackendRegistry,
    config: &ClientConfig,
) -> Result<Arc<dyn BackendClient>> {
    registry
        .create(config)
        .await
        .with_context(|| format!("cannot create '{}' backend", config.backend))
}

/// Dials `settings` into `state`. Values the calculator rejects are errors
/// here rather than silently ignored.
pub fn apply_loan_settings(
    state: &mut CalculatorState,
    settings: &LoanSettings,
) -> Result<()> {
    if let Some(principal) = settings.principal {
        ensure!(
            state.set_principal(principal),
            "loan amount {principal} must be a positive number"
        );
    }
    if let Some(term) = settings.term_months {
        ensure!(
            state.set_term(term),
            "tenure {term} must be at least one month"
        );
    }
    if let Some(rate) = settings.annual_rate_percent {
        ensure!(
            state.set_rate(rate),
            "interest rate {rate} must be a positive percentage"
        );
    }
    Ok(())
}

/// Calculator with `settings` applied and outputs up to date.
pub fn calculate(settings: &LoanSettings) -> Result<CalculatorState> {
    let mut state = CalculatorState::new();
    apply_loan_settings(&mut state, settings)?;
    state.flush();
    Ok(state)
}

/// Printable view of a calculator.
pub struct CalculatorSummary<'a>(pub &'a CalculatorState);

impl fmt::Display for CalculatorSummary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let state = self.0;
        let display = state.display();
        writeln!(f, "Loan amount:    {}", state.principal_label())?;
        writeln!(f, "Tenure:         {}", state.term_label())?;
        writeln!(f, "Interest rate:  {}", state.rate_label())?;
        writeln!(f, "Monthly EMI:    {}", display.installment)?;
        writeln!(f, "Total interest: {}", display.total_interest)?;
        write!(f, "Total payable:  {}", display.total_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub application_id: Option<ApplicationId>,
    pub product_type: ProductType,
    pub uploaded_files: usize,
    pub thank_you_name: String,
}

impl fmt::Display for ApplyReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Thank you, {}!", self.thank_you_name)?;
        writeln!(f, "Product:        {}", self.product_type)?;
        match &self.application_id {
            Some(id) => writeln!(f, "Application id: {id}")?,
            None => writeln!(f, "Application id: (not created)")?,
        }
        write!(f, "Documents:      {}", self.uploaded_files)
    }
}

/// Runs the whole wizard for `profile`: calculator, both forms, product
/// selection, background create, then one upload of every listed document.
///
/// Document paths are resolved against `base_dir`. All files are read before
/// anything is sent.
pub async fn apply(
    client: Arc<dyn BackendClient>,
    timeouts: TimeoutConfig,
    profile: &ApplicationProfile,
    base_dir: &Path,
) -> Result<ApplyReport> {
    let product_type = profile.product_type()?;
    let documents = profile.documents.load(base_dir)?;

    let mut session = LoanSession::new(client, timeouts);
    apply_loan_settings(session.calculator_mut(), &profile.loan)?;
    session.on_frame();

    session
        .capture_applicant(&profile.applicant)
        .context("applicant details")?;
    session
        .capture_business(&profile.business)
        .context("business details")?;
    let background = session.submit(product_type)?;
    info!(step = %session.step(), name = session.thank_you_name(), "application submitted");

    let uploaded_files = if documents.is_empty() {
        info!("no documents listed; skipping upload");
        0
    } else {
        match session
            .upload_documents(&documents)
            .await
            .context("document upload failed")?
        {
            UploadOutcome::Uploaded { file_count, .. } => file_count,
            UploadOutcome::AlreadyInFlight => 0,
        }
    };

    if let Some(handle) = background {
        match handle.await {
            Ok(Ok(id)) => debug!(application_id = %id, "background create finished"),
            // Already logged by the submission flow.
            Ok(Err(_)) => {}
            Err(e) => warn!(error = %e, "background create did not run to completion"),
        }
    }

    Ok(ApplyReport {
        application_id: session.application_id(),
        product_type,
        uploaded_files,
        thank_you_name: session.thank_you_name().to_string(),
    })
}

pub async fn ping(client: &dyn BackendClient) -> Result<()> {
    client.health().await.context("backend is not reachable")?;
    info!("backend is reachable");
    Ok(())
}
