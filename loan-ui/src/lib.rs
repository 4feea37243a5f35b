pub mod app;
pub mod calculator_state;
pub mod config;
pub mod logging;
pub mod models;
pub mod profile;
pub mod scheduler;
pub mod session;
pub mod submission;
pub mod transitions;
pub mod upload;
pub mod utils;

#[cfg(test)]
mod fixtures;

pub use calculator_state::CalculatorState;
pub use config::{AppConfig, TimeoutConfig};
pub use session::{LoanSession, WizardError, WizardStep};
pub use submission::{ApplicationIdSlot, ApplicationSubmissionFlow, SubmissionError};
pub use upload::{DocumentUploadCoordinator, UploadError, UploadOutcome};
