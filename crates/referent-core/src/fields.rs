use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A bibliographic field the pattern library knows how to extract.
///
/// Variant order is the canonical output order for [`ExtractedFields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Author,
    Editor,
    Title,
    Journal,
    Year,
    Volume,
    /// Issue number (`№ 3`, `no. 2`, `15(3)`).
    Number,
    Pages,
    Publisher,
    Address,
    Doi,
    Url,
    AccessDate,
    Isbn,
    /// In-press marker (`в печати`).
    Note,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Author => "author",
            Field::Editor => "editor",
            Field::Title => "title",
            Field::Journal => "journal",
            Field::Year => "year",
            Field::Volume => "volume",
            Field::Number => "number",
            Field::Pages => "pages",
            Field::Publisher => "publisher",
            Field::Address => "address",
            Field::Doi => "doi",
            Field::Url => "url",
            Field::AccessDate => "access_date",
            Field::Isbn => "isbn",
            Field::Note => "note",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields found in a single reference.
///
/// A key is present only when its pattern matched; values are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedFields(BTreeMap<Field, String>);

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `field`. Blank values are ignored so that an
    /// absent key always means "not found".
    pub fn insert(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if !value.is_empty() {
            self.0.insert(field, value.to_string());
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(Field, String)> for ExtractedFields {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        let mut fields = ExtractedFields::new();
        for (field, value) in iter {
            fields.insert(field, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_not_stored() {
        let mut fields = ExtractedFields::new();
        fields.insert(Field::Title, "   ");
        fields.insert(Field::Year, "");
        assert!(fields.is_empty());
        assert!(!fields.contains(Field::Title));
    }

    #[test]
    fn values_are_trimmed() {
        let mut fields = ExtractedFields::new();
        fields.insert(Field::Journal, "  Почвоведение ");
        assert_eq!(fields.get(Field::Journal), Some("Почвоведение"));
    }

    #[test]
    fn iteration_follows_field_order() {
        let fields: ExtractedFields = [
            (Field::Pages, "45–50".to_string()),
            (Field::Author, "Пакшина С.М.".to_string()),
            (Field::Year, "1980".to_string()),
        ]
        .into_iter()
        .collect();
        let keys: Vec<Field> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Field::Author, Field::Year, Field::Pages]);
    }

    #[test]
    fn serializes_as_snake_case_map() {
        let fields: ExtractedFields = [(Field::AccessDate, "01.02.2024".to_string())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"access_date":"01.02.2024"}"#);
    }
}
