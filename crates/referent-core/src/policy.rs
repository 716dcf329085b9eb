//! Required and optional fields per reference subtype, plus the format
//! checks applied to fields that are present.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::{ExtractedFields, Field};
use crate::identifiers::is_valid_isbn13;
use crate::issue::Issue;
use crate::style::{ApaType, GostType, MlaType, ReferenceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletenessPolicy {
    pub required: &'static [Field],
    pub optional: &'static [Field],
}

use Field::*;

const GOST_BOOK: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Publisher],
    optional: &[Year, Address, Pages, Isbn],
};
const GOST_JOURNAL_ARTICLE: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal],
    optional: &[Year, Volume, Number, Pages, Doi, Url],
};
const GOST_CONFERENCE: CompletenessPolicy = CompletenessPolicy {
    required: &[Title, Editor, Publisher],
    optional: &[Year, Address, Pages, Isbn],
};
const GOST_IN_PRESS: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal, Pages],
    optional: &[Year, Volume, Number, Note],
};
const GOST_ONLINE: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal, Url, AccessDate],
    optional: &[Year, Note],
};

const APA_JOURNAL_ARTICLE: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal, Year, Volume, Pages],
    optional: &[Number, Doi],
};
const APA_ONLINE_JOURNAL: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal, Year, Url],
    optional: &[Volume, Number, Pages],
};
const APA_WEB_PUBLICATION: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Year, Url],
    optional: &[Publisher, AccessDate],
};
const APA_BOOK: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Year, Publisher],
    optional: &[Address, Editor, Pages, Isbn],
};

const MLA_JOURNAL_ARTICLE: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal, Volume, Number, Year],
    optional: &[Pages, Doi, Url],
};
const MLA_ONLINE_JOURNAL: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Journal, Volume, Year, Pages, Url],
    optional: &[Doi],
};
const MLA_WEB_MEDIA: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Publisher, Year],
    optional: &[Url, AccessDate],
};
const MLA_MONOGRAPH: CompletenessPolicy = CompletenessPolicy {
    required: &[Author, Title, Publisher, Year],
    optional: &[Address],
};

/// Policy for a subtype. `Undetermined` has none.
pub fn policy(reference_type: ReferenceType) -> Option<&'static CompletenessPolicy> {
    let policy = match reference_type {
        ReferenceType::Gost(t) => match t {
            GostType::Book => &GOST_BOOK,
            GostType::JournalArticle => &GOST_JOURNAL_ARTICLE,
            GostType::ConferenceProceedings => &GOST_CONFERENCE,
            GostType::ArticleInPress => &GOST_IN_PRESS,
            GostType::OnlineArticle => &GOST_ONLINE,
        },
        ReferenceType::Apa(t) => match t {
            ApaType::JournalArticle => &APA_JOURNAL_ARTICLE,
            ApaType::OnlineJournal => &APA_ONLINE_JOURNAL,
            ApaType::WebPublication => &APA_WEB_PUBLICATION,
            ApaType::Book => &APA_BOOK,
        },
        ReferenceType::Mla(t) => match t {
            MlaType::JournalArticle => &MLA_JOURNAL_ARTICLE,
            MlaType::OnlineJournal => &MLA_ONLINE_JOURNAL,
            MlaType::WebMediaArticle => &MLA_WEB_MEDIA,
            MlaType::Monograph => &MLA_MONOGRAPH,
        },
        ReferenceType::Undetermined => return None,
    };
    Some(policy)
}

/// Report missing required fields (in policy order) followed by format
/// problems in the fields that are present.
pub fn check_completeness(reference_type: ReferenceType, fields: &ExtractedFields) -> Vec<Issue> {
    let Some(policy) = policy(reference_type) else {
        return Vec::new();
    };

    let in_press = reference_type == ReferenceType::Gost(GostType::ArticleInPress)
        && fields.contains(Field::Note);

    let mut issues: Vec<Issue> = policy
        .required
        .iter()
        .filter(|&&field| !(in_press && field == Field::Pages))
        .filter(|&&field| !fields.contains(field))
        .map(|&field| Issue::MissingField(field))
        .collect();

    issues.extend(check_formats(reference_type, fields));
    issues
}

fn check_formats(reference_type: ReferenceType, fields: &ExtractedFields) -> Vec<Issue> {
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}[a-z]?$").unwrap());
    static PAGE_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*с\.$").unwrap());
    static PAGE_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\s*[—–-]\s*\d+)?$").unwrap());

    let mut issues = Vec::new();

    if let Some(year) = fields.get(Field::Year).filter(|y| !YEAR.is_match(y)) {
        issues.push(Issue::InvalidYear(year.to_string()));
    }

    if let Some(pages) = fields.get(Field::Pages) {
        let (re, expected) = if expects_page_count(reference_type) {
            (&*PAGE_COUNT, "N с.")
        } else {
            (&*PAGE_RANGE, "N–M")
        };
        if !re.is_match(pages) {
            issues.push(Issue::InvalidPages {
                value: pages.to_string(),
                expected,
            });
        }
    }

    if let Some(isbn) = fields.get(Field::Isbn).filter(|i| !is_valid_isbn13(i)) {
        issues.push(Issue::InvalidIsbn(isbn.to_string()));
    }

    issues
}

/// GOST books and proceedings give the total page count (`280 с.`); every
/// other subtype cites a page or page range.
fn expects_page_count(reference_type: ReferenceType) -> bool {
    matches!(
        reference_type,
        ReferenceType::Gost(GostType::Book | GostType::ConferenceProceedings)
    )
}
