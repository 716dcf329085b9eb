use once_cell::sync::Lazy;
use tracing::trace;

use crate::cities::CityTable;
use crate::fields::{ExtractedFields, Field};
use crate::identifiers::{clean_doi, clean_url};
use crate::patterns::{self, PostProcess};
use crate::style::{GostType, ReferenceType, Style};

/// Extract fields from a cleaned reference using the built-in city table.
pub fn extract_fields(style: Style, reference_type: ReferenceType, text: &str) -> ExtractedFields {
    static CITIES: Lazy<CityTable> = Lazy::new(CityTable::default);
    extract_fields_with(style, reference_type, text, &CITIES)
}

/// Extract fields from a cleaned reference.
///
/// Every field in the style's pattern table is tried independently. The
/// `note` field carries the in-press marker and is only kept for GOST
/// articles in press.
pub fn extract_fields_with(
    style: Style,
    reference_type: ReferenceType,
    text: &str,
    cities: &CityTable,
) -> ExtractedFields {
    let mut fields = ExtractedFields::new();

    for pattern in patterns::library(style) {
        if pattern.field == Field::Note
            && reference_type != ReferenceType::Gost(GostType::ArticleInPress)
        {
            continue;
        }
        let Some(raw) = pattern.find(text) else {
            continue;
        };
        let value = match pattern.post {
            PostProcess::None => raw.to_string(),
            PostProcess::Doi => clean_doi(raw),
            PostProcess::Url => clean_url(raw),
            PostProcess::City => cities.expand(raw),
        };
        trace!(field = %pattern.field, value = %value, "extracted field");
        fields.insert(pattern.field, value);
    }

    fields
}
