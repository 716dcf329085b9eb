use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::cities::CityTable;
use crate::classifier::classify;
use crate::config::{MismatchPolicy, ValidatorConfig};
use crate::extractor::extract_fields_with;
use crate::fields::ExtractedFields;
use crate::issue::Issue;
use crate::policy::check_completeness;
use crate::style::{ReferenceType, Style};
use crate::{InvalidReference, ValidReference, ValidationReport, ValidationResult, ValidatorError};

/// Strip a leading list ordinal (`3. `) and collapse whitespace.
pub fn clean_reference(raw: &str) -> String {
    static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());
    let trimmed = raw.trim();
    let stripped = ORDINAL.replace(trimmed, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanity checks that run before classification.
///
/// Blank input yields only [`Issue::EmptyReference`]. Otherwise the text
/// must contain a four-digit year token.
pub fn basic_validation(text: &str) -> (bool, Vec<Issue>) {
    static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\D)\d{4}(?:\D|$)").unwrap());

    if text.trim().is_empty() {
        return (false, vec![Issue::EmptyReference]);
    }
    if !YEAR_TOKEN.is_match(text) {
        return (false, vec![Issue::MissingYear]);
    }
    (true, Vec::new())
}

/// Validates references against a [`ValidatorConfig`].
///
/// Cheap to share across threads; all pattern tables are static.
#[derive(Debug, Clone, Default)]
pub struct ReferenceValidator {
    config: ValidatorConfig,
    cities: CityTable,
}

enum Outcome {
    Valid(ValidReference),
    Invalid(InvalidReference),
}

impl ReferenceValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let cities = CityTable::from_override(&config.city_abbreviations);
        Self { config, cities }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// City table built from the configured abbreviations.
    pub fn cities(&self) -> &CityTable {
        &self.cities
    }

    /// Validate a single reference.
    ///
    /// `expected` is the subtype the caller believes the reference to be; a
    /// different detected subtype is reported as a type mismatch.
    pub fn validate(
        &self,
        reference: &str,
        style: Style,
        expected: Option<ReferenceType>,
    ) -> ValidationResult {
        let text = clean_reference(reference);
        self.validate_cleaned(&text, style, expected)
    }

    fn validate_cleaned(
        &self,
        text: &str,
        style: Style,
        expected: Option<ReferenceType>,
    ) -> ValidationResult {
        let (ok, basic_errors) = basic_validation(text);
        if !ok {
            return ValidationResult::invalid(basic_errors, ReferenceType::Undetermined);
        }

        let detected = match classify(style, text) {
            Ok(t) => t,
            Err(issue) => {
                return ValidationResult::invalid(vec![issue], ReferenceType::Undetermined);
            }
        };
        if !detected.is_determined() {
            return ValidationResult::invalid(
                vec![Issue::UndeterminedType { style }],
                ReferenceType::Undetermined,
            );
        }

        let mut errors = Vec::new();
        if let Some(requested) = expected.filter(|&requested| requested != detected) {
            errors.push(Issue::TypeMismatch {
                requested,
                detected,
            });
            if self.config.mismatch_policy == MismatchPolicy::ShortCircuit {
                return ValidationResult::invalid(errors, detected);
            }
        }

        let fields = extract_fields_with(style, detected, text, &self.cities);
        errors.extend(check_completeness(detected, &fields));

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            reference_type: detected,
            fields,
        }
    }

    /// Validate a batch, preserving input order within each group.
    pub fn validate_batch<S: AsRef<str>>(
        &self,
        references: &[S],
        style: Style,
        expected: Option<ReferenceType>,
    ) -> ValidationReport {
        let outcomes = references
            .iter()
            .enumerate()
            .map(|(index, reference)| self.evaluate(index, reference.as_ref(), style, expected));
        Self::partition(outcomes, style)
    }

    /// Parallel [`validate_batch`](Self::validate_batch). The report is
    /// identical to the sequential one.
    #[cfg(feature = "parallel")]
    pub fn validate_batch_par<S: AsRef<str> + Sync>(
        &self,
        references: &[S],
        style: Style,
        expected: Option<ReferenceType>,
    ) -> ValidationReport {
        use rayon::prelude::*;

        let outcomes: Vec<Outcome> = references
            .par_iter()
            .enumerate()
            .map(|(index, reference)| self.evaluate(index, reference.as_ref(), style, expected))
            .collect();
        Self::partition(outcomes, style)
    }

    fn evaluate(
        &self,
        index: usize,
        original: &str,
        style: Style,
        expected: Option<ReferenceType>,
    ) -> Outcome {
        let reference = clean_reference(original);
        let result = self.validate_cleaned(&reference, style, expected);
        debug!(
            index,
            valid = result.is_valid,
            reference_type = %result.reference_type,
            errors = result.errors.len(),
            "validated reference"
        );

        if result.is_valid {
            let journal = self
                .config
                .journal_registry()
                .and_then(|registry| registry.lookup(&result.fields, &reference));
            Outcome::Valid(ValidReference {
                index,
                reference,
                reference_type: result.reference_type,
                fields: result.fields,
                journal,
            })
        } else {
            Outcome::Invalid(InvalidReference {
                index,
                original: original.to_string(),
                reference,
                errors: result.errors,
                reference_type: result.reference_type,
            })
        }
    }

    fn partition(outcomes: impl IntoIterator<Item = Outcome>, style: Style) -> ValidationReport {
        let mut report = ValidationReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Valid(v) => report.valid.push(v),
                Outcome::Invalid(i) => report.invalid.push(i),
            }
        }
        info!(
            style = %style,
            total = report.len(),
            valid = report.valid.len(),
            invalid = report.invalid.len(),
            "batch validation complete"
        );
        report
    }
}

impl ValidationResult {
    fn invalid(errors: Vec<Issue>, reference_type: ReferenceType) -> Self {
        Self {
            is_valid: false,
            errors,
            reference_type,
            fields: ExtractedFields::new(),
        }
    }
}

static DEFAULT_VALIDATOR: Lazy<ReferenceValidator> = Lazy::new(ReferenceValidator::new);

/// Validate one reference with the default configuration.
pub fn validate_reference(
    reference: &str,
    style: Style,
    expected: Option<ReferenceType>,
) -> ValidationResult {
    DEFAULT_VALIDATOR.validate(reference, style, expected)
}

/// Validate a batch with the default configuration, parsing the style and
/// optional subtype tokens.
pub fn validate_references<S: AsRef<str>>(
    references: &[S],
    style: &str,
    subtype: Option<&str>,
) -> Result<ValidationReport, ValidatorError> {
    let style: Style = style.parse()?;
    let expected = subtype
        .map(|token| ReferenceType::parse(style, token))
        .transpose()?;
    if references.is_empty() {
        return Err(ValidatorError::EmptyInput);
    }
    Ok(DEFAULT_VALIDATOR.validate_batch(references, style, expected))
}
