//! Read-only registry of recognized journals (e.g. the VAK list).
//!
//! The registry is injected through [`ValidatorConfig`](crate::ValidatorConfig)
//! rather than held in process-global state, so callers decide which list
//! applies to a batch.

use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::fields::{ExtractedFields, Field};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("journal registry has no '{0}' column")]
    MissingColumn(&'static str),
}

/// A recognized journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journal {
    pub name: String,
    pub issn: Option<String>,
}

/// A registry entry matched to a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalMatch {
    pub journal: String,
    pub issn: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JournalRegistry {
    journals: Vec<Journal>,
    lowered: Vec<String>,
}

impl JournalRegistry {
    pub fn new(journals: Vec<Journal>) -> Self {
        let journals: Vec<Journal> = journals
            .into_iter()
            .filter(|j| !j.name.trim().is_empty())
            .collect();
        let lowered = journals
            .iter()
            .map(|j| j.name.trim().to_lowercase())
            .collect();
        Self { journals, lowered }
    }

    /// Load a registry from a CSV file with `journal` and (optionally) `ISSN`
    /// columns. Header names are matched case-insensitively.
    pub fn from_csv_path(path: &Path) -> Result<Self, RegistryError> {
        let file = std::fs::File::open(path)?;
        let registry = Self::from_csv_reader(std::io::BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            journals = registry.len(),
            "loaded journal registry"
        );
        Ok(registry)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let name_col = column("journal").ok_or(RegistryError::MissingColumn("journal"))?;
        let issn_col = column("issn");

        let mut journals = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(name) = record.get(name_col) else {
                continue;
            };
            let issn = issn_col
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(String::from);
            journals.push(Journal {
                name: name.to_string(),
                issn,
            });
        }

        Ok(Self::new(journals))
    }

    pub fn len(&self) -> usize {
        self.journals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journals.is_empty()
    }

    /// Find the first journal whose name contains `name` or is contained
    /// in it (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&Journal> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.lowered
            .iter()
            .position(|j| j.contains(&name) || name.contains(j.as_str()))
            .map(|i| &self.journals[i])
    }

    /// Match a validated reference against the registry, using the extracted
    /// journal (or publisher) and falling back to the raw text.
    pub fn lookup(&self, fields: &ExtractedFields, reference: &str) -> Option<JournalMatch> {
        let candidate = fields
            .get(Field::Journal)
            .or_else(|| fields.get(Field::Publisher))
            .map(String::from)
            .or_else(|| find_journal_name(reference))?;

        let found = self.find(&candidate);
        if found.is_none() {
            tracing::debug!(candidate = %candidate, "journal not in registry");
        }
        found.map(|j| JournalMatch {
            journal: j.name.clone(),
            issn: j.issn.clone(),
        })
    }
}

/// Guess the journal or publisher name from raw reference text.
///
/// Tries, in order: the GOST `// Journal. – 2020` form, an APA
/// `: Publisher. ISBN` tail, and a generic `. Name. 2020` segment.
pub fn find_journal_name(reference: &str) -> Option<String> {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?i)(?:^|[^:/])//\s*(.*?)\.\s*[–—-]?\s*\d{4}",
            r"(?i):\s*([^:]+)\.\s*ISBN",
            r"\.\s*([^.]+)\.\s*\d{4}",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    PATTERNS
        .iter()
        .filter_map(|re| re.captures(reference))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .find(|s| !s.is_empty())
}
