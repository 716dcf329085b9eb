use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::journals::{JournalRegistry, RegistryError};

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// What to do when the caller requested a subtype and the classifier
/// detected a different one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Report the mismatch and still check completeness against the
    /// detected type.
    #[default]
    Accompany,
    /// Report the mismatch and stop.
    ShortCircuit,
}

/// Configuration for [`ReferenceValidator`](crate::ReferenceValidator).
///
/// Use [`ValidatorConfigBuilder`] to construct one with a journal registry
/// loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// City abbreviations used to expand the `address` field.
    pub(crate) city_abbreviations: ListOverride<(String, String)>,
    /// Registry used to annotate valid references with journal and ISSN.
    pub(crate) journal_registry: Option<Arc<JournalRegistry>>,
    pub(crate) mismatch_policy: MismatchPolicy,
}

impl ValidatorConfig {
    pub fn mismatch_policy(&self) -> MismatchPolicy {
        self.mismatch_policy
    }

    pub fn journal_registry(&self) -> Option<&JournalRegistry> {
        self.journal_registry.as_deref()
    }
}

/// Builder for [`ValidatorConfig`].
///
/// A registry path is read in [`build()`](Self::build), which fails with
/// [`RegistryError`] if the file cannot be loaded.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfigBuilder {
    city_abbreviations: ListOverride<(String, String)>,
    journal_registry: Option<Arc<JournalRegistry>>,
    journal_registry_path: Option<PathBuf>,
    mismatch_policy: Option<MismatchPolicy>,
}

impl ValidatorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── City abbreviations ──

    pub fn set_city_abbreviations(mut self, entries: Vec<(String, String)>) -> Self {
        self.city_abbreviations = ListOverride::Replace(entries);
        self
    }

    pub fn add_city_abbreviation(mut self, abbreviation: &str, full_name: &str) -> Self {
        let entry = (abbreviation.to_string(), full_name.to_string());
        match &mut self.city_abbreviations {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(entry),
            ListOverride::Default => self.city_abbreviations = ListOverride::Extend(vec![entry]),
        }
        self
    }

    // ── Journal registry ──

    pub fn journal_registry(mut self, registry: JournalRegistry) -> Self {
        self.journal_registry = Some(Arc::new(registry));
        self.journal_registry_path = None;
        self
    }

    pub fn journal_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal_registry_path = Some(path.into());
        self.journal_registry = None;
        self
    }

    // ── Policies ──

    pub fn mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = Some(policy);
        self
    }

    /// Load the journal registry (if a path was given) and produce a [`ValidatorConfig`].
    pub fn build(self) -> Result<ValidatorConfig, RegistryError> {
        let journal_registry = match self.journal_registry_path {
            Some(path) => Some(Arc::new(JournalRegistry::from_csv_path(&path)?)),
            None => self.journal_registry,
        };

        Ok(ValidatorConfig {
            city_abbreviations: self.city_abbreviations,
            journal_registry,
            mismatch_policy: self.mismatch_policy.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journals::Journal;

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert_eq!(config.mismatch_policy(), MismatchPolicy::Accompany);
        assert!(config.journal_registry().is_none());
        assert!(matches!(config.city_abbreviations, ListOverride::Default));
    }

    #[test]
    fn test_builder_city_abbreviations_extend() {
        let config = ValidatorConfigBuilder::new()
            .add_city_abbreviation("Влад.", "Владивосток")
            .add_city_abbreviation("Каз.", "Казань")
            .build()
            .unwrap();
        match config.city_abbreviations {
            ListOverride::Extend(v) => assert_eq!(v.len(), 2),
            other => panic!("expected Extend, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_registry_in_memory() {
        let registry = JournalRegistry::new(vec![Journal {
            name: "Почвоведение".into(),
            issn: Some("0032-180X".into()),
        }]);
        let config = ValidatorConfigBuilder::new()
            .journal_registry(registry)
            .mismatch_policy(MismatchPolicy::ShortCircuit)
            .build()
            .unwrap();
        assert_eq!(config.journal_registry().unwrap().len(), 1);
        assert_eq!(config.mismatch_policy(), MismatchPolicy::ShortCircuit);
    }

    #[test]
    fn test_builder_missing_registry_file() {
        let result = ValidatorConfigBuilder::new()
            .journal_registry_path("/nonexistent/journals.csv")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
