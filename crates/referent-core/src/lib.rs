use serde::Serialize;
use thiserror::Error;

pub mod cities;
pub mod classifier;
pub mod config;
pub mod config_file;
pub mod extractor;
pub mod fields;
pub mod identifiers;
pub mod issue;
pub mod journals;
pub mod patterns;
pub mod policy;
pub mod style;
pub mod validator;

// Re-export for convenience
pub use classifier::classify;
pub use config::{ListOverride, MismatchPolicy, ValidatorConfig, ValidatorConfigBuilder};
pub use extractor::{extract_fields, extract_fields_with};
pub use fields::{ExtractedFields, Field};
pub use issue::{Issue, IssueKind};
pub use journals::{Journal, JournalMatch, JournalRegistry, RegistryError};
pub use policy::{CompletenessPolicy, check_completeness, policy};
pub use style::{ApaType, GostType, MlaType, ReferenceType, Style};
pub use validator::{
    ReferenceValidator, basic_validation, clean_reference, validate_reference,
    validate_references,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("no references to validate")]
    EmptyInput,
    #[error("unsupported citation style '{0}' (supported: GOST, APA, MLA)")]
    UnsupportedStyle(String),
    #[error("unknown {style} subtype '{subtype}'")]
    UnknownSubtype { style: Style, subtype: String },
}

/// The result of validating a single reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<Issue>,
    pub reference_type: ReferenceType,
    /// Empty when validation stopped before extraction.
    pub fields: ExtractedFields,
}

/// A reference that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidReference {
    /// 0-based position in the input batch.
    pub index: usize,
    /// Cleaned reference text.
    pub reference: String,
    pub reference_type: ReferenceType,
    pub fields: ExtractedFields,
    /// Registry entry for the journal, when a registry is configured and
    /// the journal is listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<JournalMatch>,
}

/// A reference with at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidReference {
    pub index: usize,
    /// Input text as given.
    pub original: String,
    /// Cleaned reference text.
    pub reference: String,
    pub errors: Vec<Issue>,
    pub reference_type: ReferenceType,
}

/// A batch partitioned into valid and invalid references. Each group keeps
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: Vec<ValidReference>,
    pub invalid: Vec<InvalidReference>,
}

impl ValidationReport {
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty()
    }
}
