use std::fmt;

/// Multipart text field carrying the application identifier.
pub const APPLICATION_ID_FIELD: &str = "applicationId";
/// Repeated multipart field carrying bank statements.
pub const BANK_STATEMENT_FIELD: &str = "bankStatementDoc";

/// The single-document slots of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    Identity,
    Address,
    BusinessRegistration,
    UtilityBill,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 4] = [
        DocumentSlot::Identity,
        DocumentSlot::Address,
        DocumentSlot::BusinessRegistration,
        DocumentSlot::UtilityBill,
    ];

    /// Multipart field name for this slot.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Identity => "identityDoc",
            Self::Address => "addressDoc",
            Self::BusinessRegistration => "businessRegistrationDoc",
            Self::UtilityBill => "utilityBillDoc",
        }
    }

    pub fn parse_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }
}

/// One selected file, held in memory until the upload request is built.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(
        mut self,
        content_type: impl Into<String>,
    ) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

// File contents stay out of logs.
impl fmt::Debug for DocumentFile {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything selected on the upload step: at most one file per
/// [`DocumentSlot`] plus any number of bank statements, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSet {
    pub identity: Option<DocumentFile>,
    pub address: Option<DocumentFile>,
    pub business_registration: Option<DocumentFile>,
    pub utility_bill: Option<DocumentFile>,
    pub bank_statements: Vec<DocumentFile>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(
        &self,
        slot: DocumentSlot,
    ) -> Option<&DocumentFile> {
        match slot {
            DocumentSlot::Identity => self.identity.as_ref(),
            DocumentSlot::Address => self.address.as_ref(),
            DocumentSlot::BusinessRegistration => self.business_registration.as_ref(),
            DocumentSlot::UtilityBill => self.utility_bill.as_ref(),
        }
    }

    /// Puts `file` into `slot`, replacing any earlier selection.
    pub fn set(
        &mut self,
        slot: DocumentSlot,
        file: DocumentFile,
    ) {
        let target = match slot {
            DocumentSlot::Identity => &mut self.identity,
            DocumentSlot::Address => &mut self.address,
            DocumentSlot::BusinessRegistration => &mut self.business_registration,
            DocumentSlot::UtilityBill => &mut self.utility_bill,
        };
        *target = Some(file);
    }

    pub fn with(
        mut self,
        slot: DocumentSlot,
        file: DocumentFile,
    ) -> Self {
        self.set(slot, file);
        self
    }

    pub fn push_bank_statement(
        &mut self,
        file: DocumentFile,
    ) {
        self.bank_statements.push(file);
    }

    pub fn with_bank_statement(
        mut self,
        file: DocumentFile,
    ) -> Self {
        self.push_bank_statement(file);
        self
    }

    /// Every file paired with its multipart field name: named slots first in
    /// [`DocumentSlot::ALL`] order, then bank statements in selection order.
    /// Bank statements without a name are called `bank_<index>`.
    pub fn parts(&self) -> Vec<(&'static str, String, &DocumentFile)> {
        let named = DocumentSlot::ALL.into_iter().filter_map(|slot| {
            self.slot(slot)
                .map(|file| (slot.field_name(), file.file_name.clone(), file))
        });

        let statements = self
            .bank_statements
            .iter()
            .enumerate()
            .map(|(idx, file)| {
                let name = if file.file_name.trim().is_empty() {
                    format!("bank_{idx}")
                } else {
                    file.file_name.clone()
                };
                (BANK_STATEMENT_FIELD, name, file)
            });

        named.chain(statements).collect()
    }

    pub fn file_count(&self) -> usize {
        DocumentSlot::ALL
            .into_iter()
            .filter(|slot| self.slot(*slot).is_some())
            .count()
            + self.bank_statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }
}
