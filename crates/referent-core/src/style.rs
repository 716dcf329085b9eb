use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::ValidatorError;

/// A supported citation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Style {
    Gost,
    Apa,
    Mla,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Gost, Style::Apa, Style::Mla];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Gost => "GOST",
            Style::Apa => "APA",
            Style::Mla => "MLA",
        }
    }

    /// The closed set of structural subtypes recognized for this style.
    pub fn subtypes(&self) -> &'static [ReferenceType] {
        match self {
            Style::Gost => &GOST_SUBTYPES,
            Style::Apa => &APA_SUBTYPES,
            Style::Mla => &MLA_SUBTYPES,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = ValidatorError;

    /// Style tokens are case-insensitive: `gost`, `Apa` and `MLA` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GOST" => Ok(Style::Gost),
            "APA" => Ok(Style::Apa),
            "MLA" => Ok(Style::Mla),
            _ => Err(ValidatorError::UnsupportedStyle(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GostType {
    Book,
    JournalArticle,
    ConferenceProceedings,
    ArticleInPress,
    OnlineArticle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApaType {
    JournalArticle,
    OnlineJournal,
    WebPublication,
    Book,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MlaType {
    JournalArticle,
    OnlineJournal,
    WebMediaArticle,
    Monograph,
}

/// Structural subtype of a reference within its style.
///
/// `Undetermined` is the sentinel used when basic validation or the
/// structural skeleton check fails, or when no subtype cue matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    Gost(GostType),
    Apa(ApaType),
    Mla(MlaType),
    Undetermined,
}

const GOST_SUBTYPES: [ReferenceType; 5] = [
    ReferenceType::Gost(GostType::Book),
    ReferenceType::Gost(GostType::JournalArticle),
    ReferenceType::Gost(GostType::ConferenceProceedings),
    ReferenceType::Gost(GostType::ArticleInPress),
    ReferenceType::Gost(GostType::OnlineArticle),
];

const APA_SUBTYPES: [ReferenceType; 4] = [
    ReferenceType::Apa(ApaType::JournalArticle),
    ReferenceType::Apa(ApaType::OnlineJournal),
    ReferenceType::Apa(ApaType::WebPublication),
    ReferenceType::Apa(ApaType::Book),
];

const MLA_SUBTYPES: [ReferenceType; 4] = [
    ReferenceType::Mla(MlaType::JournalArticle),
    ReferenceType::Mla(MlaType::OnlineJournal),
    ReferenceType::Mla(MlaType::WebMediaArticle),
    ReferenceType::Mla(MlaType::Monograph),
];

impl ReferenceType {
    /// User-facing (Russian) label.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceType::Gost(t) => match t {
                GostType::Book => "Книга",
                GostType::JournalArticle => "Статья в журнале",
                GostType::ConferenceProceedings => "Материалы конференций",
                GostType::ArticleInPress => "Статья в печати",
                GostType::OnlineArticle => "Онлайн-статья",
            },
            ReferenceType::Apa(t) => match t {
                ApaType::JournalArticle => "Журнальная статья",
                ApaType::OnlineJournal => "Онлайн-журнал",
                ApaType::WebPublication => "Сетевое издание",
                ApaType::Book => "Книга",
            },
            ReferenceType::Mla(t) => match t {
                MlaType::JournalArticle => "Журнальная статья",
                MlaType::OnlineJournal => "Интернет-журнал",
                MlaType::WebMediaArticle => "Статья в онлайн-СМИ",
                MlaType::Monograph => "Монография",
            },
            ReferenceType::Undetermined => "Не определён",
        }
    }

    /// Stable ASCII identifier, accepted on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            ReferenceType::Gost(t) => match t {
                GostType::Book => "book",
                GostType::JournalArticle => "journal-article",
                GostType::ConferenceProceedings => "conference-proceedings",
                GostType::ArticleInPress => "article-in-press",
                GostType::OnlineArticle => "online-article",
            },
            ReferenceType::Apa(t) => match t {
                ApaType::JournalArticle => "journal-article",
                ApaType::OnlineJournal => "online-journal",
                ApaType::WebPublication => "web-publication",
                ApaType::Book => "book",
            },
            ReferenceType::Mla(t) => match t {
                MlaType::JournalArticle => "journal-article",
                MlaType::OnlineJournal => "online-journal",
                MlaType::WebMediaArticle => "web-media-article",
                MlaType::Monograph => "monograph",
            },
            ReferenceType::Undetermined => "undetermined",
        }
    }

    pub fn style(&self) -> Option<Style> {
        match self {
            ReferenceType::Gost(_) => Some(Style::Gost),
            ReferenceType::Apa(_) => Some(Style::Apa),
            ReferenceType::Mla(_) => Some(Style::Mla),
            ReferenceType::Undetermined => None,
        }
    }

    pub fn is_determined(&self) -> bool {
        !matches!(self, ReferenceType::Undetermined)
    }

    /// Resolve a subtype token for `style`.
    ///
    /// Accepts the label (`Статья в журнале`) or the slug (`journal-article`,
    /// `journal_article`, `Journal Article`), case-insensitively.
    pub fn parse(style: Style, token: &str) -> Result<ReferenceType, ValidatorError> {
        let wanted = token.trim().to_lowercase();
        let wanted_slug = wanted.replace(['_', ' '], "-");

        style
            .subtypes()
            .iter()
            .copied()
            .find(|t| t.label().to_lowercase() == wanted || t.slug() == wanted_slug)
            .ok_or_else(|| ValidatorError::UnknownSubtype {
                style,
                subtype: token.trim().to_string(),
            })
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ReferenceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_tokens_are_case_insensitive() {
        assert_eq!("gost".parse::<Style>().unwrap(), Style::Gost);
        assert_eq!(" Apa ".parse::<Style>().unwrap(), Style::Apa);
        assert_eq!("MLA".parse::<Style>().unwrap(), Style::Mla);
    }

    #[test]
    fn unknown_style_lists_supported_styles() {
        let err = "Chicago".parse::<Style>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Chicago"));
        assert!(msg.contains("APA"));
        assert!(msg.contains("GOST"));
        assert!(msg.contains("MLA"));
    }

    #[test]
    fn parse_subtype_by_label() {
        assert_eq!(
            ReferenceType::parse(Style::Gost, "Статья в журнале").unwrap(),
            ReferenceType::Gost(GostType::JournalArticle)
        );
        assert_eq!(
            ReferenceType::parse(Style::Mla, "монография").unwrap(),
            ReferenceType::Mla(MlaType::Monograph)
        );
    }

    #[test]
    fn parse_subtype_by_slug() {
        assert_eq!(
            ReferenceType::parse(Style::Gost, "article_in_press").unwrap(),
            ReferenceType::Gost(GostType::ArticleInPress)
        );
        assert_eq!(
            ReferenceType::parse(Style::Apa, "Web Publication").unwrap(),
            ReferenceType::Apa(ApaType::WebPublication)
        );
    }

    #[test]
    fn parse_subtype_is_scoped_to_style() {
        // "Онлайн-статья" exists only for GOST
        assert!(ReferenceType::parse(Style::Apa, "Онлайн-статья").is_err());
        // "Книга" exists for GOST and APA but maps to different variants
        assert_eq!(
            ReferenceType::parse(Style::Apa, "Книга").unwrap(),
            ReferenceType::Apa(ApaType::Book)
        );
    }

    #[test]
    fn every_subtype_round_trips_through_parse() {
        for style in Style::ALL {
            for t in style.subtypes() {
                assert_eq!(ReferenceType::parse(style, t.label()).unwrap(), *t);
                assert_eq!(ReferenceType::parse(style, t.slug()).unwrap(), *t);
                assert_eq!(t.style(), Some(style));
            }
        }
    }

    #[test]
    fn undetermined_has_no_style() {
        assert_eq!(ReferenceType::Undetermined.style(), None);
        assert!(!ReferenceType::Undetermined.is_determined());
    }
}
