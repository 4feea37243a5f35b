//! TOML loader for applicant profiles used by the `apply` command.
//!
//! ## Format
//!
//! | Table         | Required | Notes                                                   |
//! |---------------|----------|---------------------------------------------------------|
//! | `product`     | no       | `"Term Loan"` (default) or `"Overdraft Limit"`          |
//! | `[applicant]` | yes      | `full_name`, `mobile`, `email`, `pan_number`, `terms_accepted` |
//! | `[business]`  | yes      | field names as on the business-details step             |
//! | `[loan]`      | no       | `principal`, `term_months`, `annual_rate_percent`       |
//! | `[documents]` | no       | `identity`, `address`, `business_registration`, `utility_bill`, `bank_statements = [...]` |
//!
//! Form values are kept as text and validated by the wizard, exactly as if
//! they had been typed. Document paths are resolved against the profile
//! file's directory.
//!
//! ### Minimal example
//!
//! ```toml
//! [applicant]
//! full_name = "Asha Verma"
//! mobile = "9876543210"
//! email = "asha@verma.in"
//! pan_number = "ABCDE1234F"
//! terms_accepted = true
//!
//! [business]
//! trade_name = "Verma Textiles"
//! # ...
//! ```

use std::path::{Path, PathBuf};

use loan_core::{DocumentFile, DocumentSet, DocumentSlot, ProductType};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ApplicantForm, BusinessForm};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unrecognised product '{0}'")]
    UnknownProduct(String),
}

/// Calculator values to dial in before submitting. Omitted values keep the
/// calculator defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoanSettings {
    pub principal: Option<f64>,
    pub term_months: Option<f64>,
    pub annual_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentPaths {
    pub identity: Option<PathBuf>,
    pub address: Option<PathBuf>,
    pub business_registration: Option<PathBuf>,
    pub utility_bill: Option<PathBuf>,
    pub bank_statements: Vec<PathBuf>,
}

impl DocumentPaths {
    fn slots(&self) -> [(DocumentSlot, Option<&PathBuf>); 4] {
        [
            (DocumentSlot::Identity, self.identity.as_ref()),
            (DocumentSlot::Address, self.address.as_ref()),
            (DocumentSlot::BusinessRegistration, self.business_registration.as_ref()),
            (DocumentSlot::UtilityBill, self.utility_bill.as_ref()),
        ]
    }

    /// Reads every listed file. Relative paths are taken from `base_dir`.
    pub fn load(
        &self,
        base_dir: &Path,
    ) -> Result<DocumentSet, ProfileError> {
        let mut documents = DocumentSet::new();

        for (slot, path) in self.slots() {
            if let Some(path) = path {
                documents.set(slot, read_document(&base_dir.join(path))?);
            }
        }
        for path in &self.bank_statements {
            documents.push_bank_statement(read_document(&base_dir.join(path))?);
        }

        Ok(documents)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApplicationProfile {
    pub product: Option<String>,
    pub applicant: ApplicantForm,
    pub business: BusinessForm,
    pub loan: LoanSettings,
    pub documents: DocumentPaths,
}

impl ApplicationProfile {
    /// The selected product; Term Loan when none is given.
    pub fn product_type(&self) -> Result<ProductType, ProfileError> {
        match self.product.as_deref() {
            None => Ok(ProductType::TermLoan),
            Some(name) => ProductType::parse(name)
                .ok_or_else(|| ProfileError::UnknownProduct(name.to_string())),
        }
    }
}

/// Parse profile text.
pub fn load_from_str(input: &str) -> Result<ApplicationProfile, ProfileError> {
    Ok(toml::from_str(input)?)
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<ApplicationProfile, ProfileError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

/// MIME type for the handful of formats the upload form accepts.
pub fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

fn read_document(path: &Path) -> Result<DocumentFile, ProfileError> {
    let bytes = std::fs::read(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = DocumentFile::new(file_name, bytes);
    Ok(match guess_content_type(path) {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}
