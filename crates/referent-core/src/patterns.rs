//! Field pattern library: per-style tables mapping a [`Field`] to one or
//! more extraction regexes.
//!
//! Every regex exposes the extracted text as the named group `value`. The
//! tables are compiled once on first use and shared read-only.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::Field;
use crate::style::Style;

/// Post-processing applied to a raw match before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    None,
    /// Trim unbalanced trailing brackets and punctuation from a DOI.
    Doi,
    /// Trim unbalanced trailing brackets and punctuation from a URL.
    Url,
    /// Expand abbreviated city names through the city table.
    City,
}

/// Extraction rule for a single field.
///
/// Alternatives are tried in order; the first one that matches wins, and
/// within an alternative the leftmost match wins.
#[derive(Debug)]
pub struct FieldPattern {
    pub field: Field,
    pub post: PostProcess,
    alternatives: Vec<Regex>,
}

impl FieldPattern {
    fn new(field: Field, post: PostProcess, patterns: &[&str]) -> Self {
        let alternatives = patterns
            .iter()
            .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("bad {field} pattern {p:?}: {e}")))
            .collect();
        Self {
            field,
            post,
            alternatives,
        }
    }

    /// Return the raw `value` capture of the first matching alternative.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.alternatives.iter().find_map(|re| {
            re.captures(text)
                .and_then(|caps| caps.name("value"))
                .map(|m| m.as_str().trim().trim_end_matches([',', ';']).trim_end())
                .filter(|s| !s.is_empty())
        })
    }
}

// ── Shared building blocks ──

/// GOST `//` journal separator. A `//` right after `:` or `/` belongs to a
/// URL scheme and is not a separator.
pub(crate) const GOST_SEPARATOR: &str = r"(?:^|[^:/])//";

/// Surname followed by one or two initials: `Пакшина С.М.`, `Ким С. Ю.`.
const GOST_AUTHOR: &str =
    r"[А-ЯЁA-Z][а-яёa-z'’\-]+(?:-[А-ЯЁA-Z][а-яёa-z]+)?,?\s+[А-ЯЁA-Z]\.\s?(?:[А-ЯЁA-Z]\.)?";

/// Publishing city, including multi-word and abbreviated forms.
const CITY: &str =
    r"(?:Ростов\s+н/Д|[А-ЯЁA-Z][\p{L}\-]*\.?(?:\s[А-ЯЁA-Z][\p{L}\-]*\.?)?(?:,\s?[A-Z]{2})?)";

/// APA parenthesized date: `(2020)`, `(2020a)`, `(2020, May 5)`, `(n.d.)`.
const APA_DATE: &str = r"\((?:\d{4}[a-z]?|n\.\s?d\.)(?:,[^)]*)?\)";

/// One or two initials followed by a surname, or the reverse.
const EDITOR_NAME: &str = r"(?:[А-ЯЁA-Z]\.\s?){1,2}\s?[А-ЯЁA-Z][а-яёa-z\-]+|[А-ЯЁA-Z][а-яёa-z\-]+\s+(?:[А-ЯЁA-Z]\.\s?){1,2}";

const URL: &str = r#"(?P<value>(?:https?://|www\.)[^\s<>"«»]+)"#;
const DOI_PREFIXED: &str =
    r"(?i)(?:doi:?\s*|https?://(?:dx\.)?doi\.org/)(?P<value>10\.\d{4,}/[^\s\]>},]+)";
const DOI_BARE: &str = r"(?P<value>10\.\d{4,}/[^\s\]>},]+)";
const ISBN: &str = r"(?i)ISBN\s*:?\s*(?P<value>[\dX][\dX\- ]{8,}[\dX])";
const FIRST_YEAR: &str = r"(?:^|\D)(?P<value>\d{4})(?:\D|$)";
const IN_PRESS: &str = r"(?i)(?P<value>в\s+печати|in\s+press)";

static GOST_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    let authors = format!(r"{GOST_AUTHOR}(?:,\s*{GOST_AUTHOR})*");
    vec![
        FieldPattern::new(
            Field::Author,
            PostProcess::None,
            &[&format!(r"^(?P<value>{authors})(?:\s|$)")],
        ),
        FieldPattern::new(
            Field::Editor,
            PostProcess::None,
            &[&format!(r"[Пп]од\s+(?:общ\.\s+|науч\.\s+)?ред\.\s*(?P<value>{EDITOR_NAME})")],
        ),
        FieldPattern::new(
            Field::Title,
            PostProcess::None,
            &[
                &format!(
                    r"^(?:{authors})\.?\s+(?P<value>[^/]+?)(?:\s*//|\s+/\s|\.?\s+[—–]\s|\.\s|\.?$)"
                ),
                // No leading author: title up to the responsibility statement
                r"^(?P<value>[^/]+?)\s+/\s",
            ],
        ),
        FieldPattern::new(
            Field::Journal,
            PostProcess::None,
            &[&format!(
                r"{GOST_SEPARATOR}\s*(?P<value>.+?)\s*[.,]\s*(?:[—–-]\s*)?(?:\d{{4}}|[ТтVv]\.|№)"
            )],
        ),
        FieldPattern::new(
            Field::Year,
            PostProcess::None,
            &[
                &format!(r"{GOST_SEPARATOR}.+?[.,]\s*(?:[—–-]\s*)?(?P<value>\d{{4}})(?:\D|$)"),
                &format!(r"{CITY}\s*:\s*[^,:;/]+?\s*,\s*(?P<value>\d{{4}})(?:\D|$)"),
                FIRST_YEAR,
            ],
        ),
        FieldPattern::new(
            Field::Volume,
            PostProcess::None,
            &[r"(?:^|[\s.,(])(?:[Тт]ом|[Тт]\.|[Vv]ol\.)\s*(?P<value>\d+)"],
        ),
        FieldPattern::new(
            Field::Number,
            PostProcess::None,
            &[r"(?:№|[Вв]ып\.|[Nn]o\.)\s*(?P<value>\d+)"],
        ),
        FieldPattern::new(
            Field::Pages,
            PostProcess::None,
            &[
                r"(?:^|[\s.,])(?:[СсPp]|[Pp]p)\.\s*(?P<value>\d+(?:\s*[—–-]\s*\d+)?)",
                r"(?P<value>\d+\s*с\.)",
            ],
        ),
        FieldPattern::new(
            Field::Publisher,
            PostProcess::None,
            &[&format!(r"(?:^|[\s.—–-]){CITY}\s*:\s*(?P<value>[^,:;/]+?)\s*,\s*\d{{4}}")],
        ),
        FieldPattern::new(
            Field::Address,
            PostProcess::City,
            &[&format!(r"(?:^|[\s.—–-])(?P<value>{CITY})\s*:\s*[^,:;/]+?\s*,\s*\d{{4}}")],
        ),
        FieldPattern::new(Field::Doi, PostProcess::Doi, &[DOI_PREFIXED, DOI_BARE]),
        FieldPattern::new(Field::Url, PostProcess::Url, &[URL]),
        FieldPattern::new(
            Field::AccessDate,
            PostProcess::None,
            &[r"(?i)(?:дата\s+обращения|accessed)\s*:?\s*(?P<value>\d{1,2}\.\d{1,2}\.\d{4})"],
        ),
        FieldPattern::new(Field::Isbn, PostProcess::None, &[ISBN]),
        FieldPattern::new(Field::Note, PostProcess::None, &[IN_PRESS]),
    ]
});

static APA_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    let apa_city = r"[A-ZА-ЯЁ][\p{L}.\-]*(?:,?\s+[A-ZА-ЯЁ][\p{L}.\-]*)*";
    vec![
        FieldPattern::new(
            Field::Author,
            PostProcess::None,
            &[r"^(?P<value>.+?)\s*\((?:\d{4}|n\.\s?d\.)"],
        ),
        FieldPattern::new(
            Field::Editor,
            PostProcess::None,
            &[r"(?:In|В)\s+(?P<value>[^()]+?)\s*\((?:Eds?|Ред)\.\)"],
        ),
        FieldPattern::new(
            Field::Title,
            PostProcess::None,
            &[&format!(r"{APA_DATE}\.\s+(?P<value>.+?)[.?!](?:\s|$)")],
        ),
        FieldPattern::new(
            Field::Journal,
            PostProcess::None,
            &[&format!(r"{APA_DATE}\.\s+.+?[.?!]\s+(?P<value>[^,]+?),\s*\d+")],
        ),
        FieldPattern::new(
            Field::Year,
            PostProcess::None,
            &[r"\((?P<value>\d{4}[a-z]?|n\.\s?d\.)(?:,[^)]*)?\)"],
        ),
        FieldPattern::new(
            Field::Volume,
            PostProcess::None,
            &[
                r",\s*(?P<value>\d+)\s*(?:\(\d+(?:[–-]\d+)?\))?\s*,\s*(?:pp?\.\s*)?\d+",
                r",\s*(?P<value>\d+)\s*\(\d+(?:[–-]\d+)?\)",
            ],
        ),
        FieldPattern::new(
            Field::Number,
            PostProcess::None,
            &[r"\d\s*\((?P<value>\d+(?:[–-]\d+)?)\)"],
        ),
        FieldPattern::new(
            Field::Pages,
            PostProcess::None,
            &[
                r",\s*(?:pp?\.\s*)?(?P<value>\d+\s*[—–-]\s*\d+)",
                r"\(pp?\.\s*(?P<value>\d+\s*[—–-]\s*\d+)\)",
            ],
        ),
        FieldPattern::new(
            Field::Publisher,
            PostProcess::None,
            &[&format!(r"{APA_DATE}\.\s+.+?[.?!]\s+{apa_city}\s*:\s*(?P<value>[^.:/]+)")],
        ),
        FieldPattern::new(
            Field::Address,
            PostProcess::City,
            &[&format!(r"{APA_DATE}\.\s+.+?[.?!]\s+(?P<value>{apa_city})\s*:\s*[^.:/]+")],
        ),
        FieldPattern::new(Field::Doi, PostProcess::Doi, &[DOI_PREFIXED, DOI_BARE]),
        FieldPattern::new(Field::Url, PostProcess::Url, &[URL]),
        FieldPattern::new(
            Field::AccessDate,
            PostProcess::None,
            &[r"(?i)retrieved\s+(?P<value>[a-z]+\s+\d{1,2},\s*\d{4})"],
        ),
        FieldPattern::new(Field::Isbn, PostProcess::None, &[ISBN]),
    ]
});

static MLA_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    let quoted_title = r#"["“«][^"”»]+["”»]"#;
    vec![
        FieldPattern::new(
            Field::Author,
            PostProcess::None,
            &[
                // A trailing initial keeps its period: `Жукова Т. А.`
                r#"^(?P<value>[^"“«]+?(?:\b\p{Lu}\.)?)\.?\s+["“«]"#,
                r"^(?P<value>[^.]+?)\.\s",
            ],
        ),
        FieldPattern::new(
            Field::Title,
            PostProcess::None,
            &[
                r#"["“«](?P<value>[^"”»]+?)[.,]?["”»]"#,
                r"^[^.]+\.\s+(?P<value>[^.]+)\.",
            ],
        ),
        FieldPattern::new(
            Field::Journal,
            PostProcess::None,
            &[&format!(r"{quoted_title}\s*(?P<value>[^,]+?),")],
        ),
        FieldPattern::new(
            Field::Year,
            PostProcess::None,
            &[
                r",\s*(?:\d{1,2}\s+\p{L}+\.?\s+)?(?P<value>\d{4})(?:\D|$)",
                FIRST_YEAR,
            ],
        ),
        FieldPattern::new(
            Field::Volume,
            PostProcess::None,
            &[r"(?i)(?:vol\.|т\.)\s*(?P<value>\d+)"],
        ),
        FieldPattern::new(
            Field::Number,
            PostProcess::None,
            &[r"(?i)(?:no\.|№)\s*(?P<value>\d+)"],
        ),
        FieldPattern::new(
            Field::Pages,
            PostProcess::None,
            &[r"(?i)(?:^|[\s,])(?:pp?|с)\.\s*(?P<value>\d+(?:\s*[—–-]\s*\d+)?)"],
        ),
        FieldPattern::new(
            Field::Publisher,
            PostProcess::None,
            &[
                r"\.\s+(?P<value>[^,.]+?),\s*\d{4}\.?\s*$",
                &format!(
                    r"{quoted_title}\s*(?P<value>[^,]+?),\s*\d{{1,2}}\s+\p{{L}}+\.?\s+\d{{4}}"
                ),
            ],
        ),
        FieldPattern::new(
            Field::Address,
            PostProcess::City,
            &[&format!(r"(?:^|[\s.])(?P<value>{CITY})\s*:\s*[^,:]+,\s*\d{{4}}")],
        ),
        FieldPattern::new(Field::Doi, PostProcess::Doi, &[DOI_PREFIXED, DOI_BARE]),
        FieldPattern::new(Field::Url, PostProcess::Url, &[URL]),
        FieldPattern::new(
            Field::AccessDate,
            PostProcess::None,
            &[
                r"(?i)accessed\s+(?P<value>\d{1,2}\s+\p{L}+\.?\s+\d{4})",
                r"(?i)дата\s+обращения\s*:?\s*(?P<value>\d{1,2}\.\d{1,2}\.\d{4})",
            ],
        ),
        FieldPattern::new(Field::Isbn, PostProcess::None, &[ISBN]),
    ]
});

/// The pattern table for `style`.
pub fn library(style: Style) -> &'static [FieldPattern] {
    match style {
        Style::Gost => &GOST_PATTERNS,
        Style::Apa => &APA_PATTERNS,
        Style::Mla => &MLA_PATTERNS,
    }
}
