//! Rule-based subtype classification.
//!
//! Cues are checked in a fixed order per style and the first one that fires
//! decides the subtype. Classification only looks at the cleaned reference
//! text, never at extracted fields.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::issue::Issue;
use crate::patterns::GOST_SEPARATOR;
use crate::style::{ApaType, GostType, MlaType, ReferenceType, Style};

/// Classify a cleaned reference.
///
/// Returns `Err` with a structural issue when an APA or MLA reference does
/// not fit the style's minimal skeleton. GOST has no skeleton requirement
/// and always yields a subtype.
pub fn classify(style: Style, text: &str) -> Result<ReferenceType, Issue> {
    let detected = match style {
        Style::Gost => Ok(ReferenceType::Gost(classify_gost(text))),
        Style::Apa => classify_apa(text),
        Style::Mla => classify_mla(text),
    };
    match &detected {
        Ok(t) => debug!(style = %style, detected = %t, "classified reference"),
        Err(issue) => debug!(style = %style, %issue, "reference failed style skeleton"),
    }
    detected
}

/// Whether the reference carries an in-press marker (`в печати`, `in press`).
pub fn has_in_press_marker(text: &str) -> bool {
    static IN_PRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)в\s+печати|in\s+press").unwrap());
    IN_PRESS.is_match(text)
}

fn classify_gost(text: &str) -> GostType {
    static JOURNAL_SEP: Lazy<Regex> =
        Lazy::new(|| Regex::new(&format!(r"{GOST_SEPARATOR}.*?\d{{4}}")).unwrap());
    static ONLINE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)(?:https?://|www\.)\S+.*?(?:дата\s+обращения|accessed)").unwrap()
    });
    static EDITOR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)под\s+(?:общ\.\s*|науч\.\s*)?ред\.").unwrap());

    if JOURNAL_SEP.is_match(text) {
        if has_in_press_marker(text) {
            return GostType::ArticleInPress;
        }
        if ONLINE.is_match(text) {
            return GostType::OnlineArticle;
        }
        return GostType::JournalArticle;
    }
    if EDITOR.is_match(text) {
        return GostType::ConferenceProceedings;
    }
    GostType::Book
}

fn classify_apa(text: &str) -> Result<ReferenceType, Issue> {
    static SKELETON: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^.+?\s*\((?:\d{4}[a-z]?|n\.\s?d\.)(?:,[^)]*)?\)\.\s+.+?[.?!](?:\s|$)").unwrap()
    });
    static VOLUME_PAGES: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r",\s*\d+\s*(?:\(\d+(?:[–-]\d+)?\))?,\s*(?:pp?\.\s*)?\d+\s*[—–-]\s*\d+").unwrap()
    });
    static RETRIEVED: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)retrieved\s+(?:.*?\s)?from\s+(?:https?://|www\.)\S+").unwrap()
    });
    static ISSUE_IN_PARENS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\d+\s*\(\d+(?:[–-]\d+)?\)").unwrap());
    static CITY_PUBLISHER: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"\((?:\d{4}[a-z]?|n\.\s?d\.)(?:,[^)]*)?\)\.\s+.+?[.?!]\s+[A-ZА-ЯЁ][\p{L}.\-]*(?:,?\s+[A-ZА-ЯЁ][\p{L}.\-]*)*\s*:\s*[^.:/]+",
        )
        .unwrap()
    });

    if !SKELETON.is_match(text) {
        return Err(Issue::Structural {
            style: Style::Apa,
            expected: "«Автор (Год). Название.»",
        });
    }

    let subtype = if VOLUME_PAGES.is_match(text) {
        ApaType::JournalArticle
    } else if RETRIEVED.is_match(text) {
        if ISSUE_IN_PARENS.is_match(text) {
            ApaType::OnlineJournal
        } else {
            ApaType::WebPublication
        }
    } else if CITY_PUBLISHER.is_match(text) {
        ApaType::Book
    } else {
        return Ok(ReferenceType::Undetermined);
    };
    Ok(ReferenceType::Apa(subtype))
}

fn classify_mla(text: &str) -> Result<ReferenceType, Issue> {
    static SKELETON: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"^[^"“«]+?\.\s+(?:["“«][^"”»]+["”»]|[^.]+\.)"#).unwrap());
    static VOLUME_ISSUE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)(?:vol\.|т\.)\s*\d+,\s*(?:no\.|№)\s*\d+").unwrap());
    static VOLUME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:vol\.|т\.)\s*\d+").unwrap());
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\D)\d{4}(?:\D|$)").unwrap());
    static PAGES: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)(?:^|[\s,])(?:pp?|с)\.\s*\d+").unwrap());
    static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:https?://|www\.)\S+").unwrap());
    static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?i)\b\d{1,2}\s+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?|января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря)\.?\s+\d{4}",
        )
        .unwrap()
    });
    static MONOGRAPH: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\.\s+[^,.]+,\s*\d{4}\.?\s*$").unwrap());

    if !SKELETON.is_match(text) {
        return Err(Issue::Structural {
            style: Style::Mla,
            expected: "«Автор. \"Название.\"» или «Автор. Название.»",
        });
    }

    let subtype = if VOLUME_ISSUE.is_match(text) {
        MlaType::JournalArticle
    } else if VOLUME.is_match(text)
        && YEAR.is_match(text)
        && PAGES.is_match(text)
        && URL.is_match(text)
    {
        MlaType::OnlineJournal
    } else if DAY_MONTH_YEAR.is_match(text) {
        MlaType::WebMediaArticle
    } else if MONOGRAPH.is_match(text) {
        MlaType::Monograph
    } else {
        return Ok(ReferenceType::Undetermined);
    };
    Ok(ReferenceType::Mla(subtype))
}
