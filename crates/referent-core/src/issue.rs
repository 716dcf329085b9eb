use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::fields::Field;
use crate::style::{ReferenceType, Style};

/// Error taxonomy for a single reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Empty input or no year at all. Short-circuits everything else.
    Basic,
    /// The reference does not fit the minimal skeleton of its style.
    Structural,
    /// A field required by the subtype's policy is missing.
    Completeness,
    /// A field is present but malformed.
    Format,
    /// The caller asked for one subtype and the classifier found another.
    TypeMismatch,
}

/// One problem found while validating a reference.
///
/// The `Display` output is the human-readable message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("Пустая библиографическая запись.")]
    EmptyReference,
    #[error("Отсутствует год издания: в записи не найден четырёхзначный год.")]
    MissingYear,
    #[error("Запись не соответствует структуре {style}: ожидается {expected}.")]
    Structural {
        style: Style,
        expected: &'static str,
    },
    #[error("Не удалось определить тип источника по правилам {style}.")]
    UndeterminedType { style: Style },
    #[error("Запись не соответствует запрошенному типу «{requested}»; определён тип «{detected}».")]
    TypeMismatch {
        requested: ReferenceType,
        detected: ReferenceType,
    },
    #[error("Отсутствует обязательное поле: {0}")]
    MissingField(Field),
    #[error("Год «{0}» должен состоять из четырёх цифр.")]
    InvalidYear(String),
    #[error("Страницы «{value}» не соответствуют формату «{expected}».")]
    InvalidPages {
        value: String,
        expected: &'static str,
    },
    #[error("ISBN «{0}» должен содержать 13 цифр (с дефисами или без).")]
    InvalidIsbn(String),
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::EmptyReference | Issue::MissingYear => IssueKind::Basic,
            Issue::Structural { .. } | Issue::UndeterminedType { .. } => IssueKind::Structural,
            Issue::TypeMismatch { .. } => IssueKind::TypeMismatch,
            Issue::MissingField(_) => IssueKind::Completeness,
            Issue::InvalidYear(_) | Issue::InvalidPages { .. } | Issue::InvalidIsbn(_) => {
                IssueKind::Format
            }
        }
    }

    /// Soft issues are warnings about otherwise well-formed input; they still
    /// place the reference in the invalid group.
    pub fn is_soft(&self) -> bool {
        matches!(self, Issue::MissingYear | Issue::TypeMismatch { .. })
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Issue", 2)?;
        s.serialize_field("kind", &self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}
