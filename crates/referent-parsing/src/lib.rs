use thiserror::Error;

pub mod section;
pub mod text_processing;

pub use section::{
    SegmentationResult, SegmentationStrategy, find_bibliography_section, segment_references,
    segment_references_detailed,
};
pub use text_processing::{clean_multiline_reference, expand_ligatures};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("no bibliography section found")]
    NoBibliographySection,
}

/// Split pasted text into references.
///
/// If the text has a bibliography header, only the section after it is
/// segmented; otherwise the whole text is treated as a reference list.
pub fn extract_references_from_text(text: &str) -> Vec<String> {
    match find_bibliography_section(text) {
        Some(section) => segment_references(&section),
        None => segment_references(text),
    }
}

/// Like [`extract_references_from_text`], but fails when the text has no
/// bibliography header.
pub fn extract_references_from_section(text: &str) -> Result<Vec<String>, ParsingError> {
    let section = find_bibliography_section(text).ok_or(ParsingError::NoBibliographySection)?;
    Ok(segment_references(&section))
}
