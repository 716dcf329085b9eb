use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::text_processing::clean_multiline_reference;

/// Segmentation strategy identifier, for debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentationStrategy {
    /// `Пример оформления …: N` markers, as in style guides that list
    /// numbered examples.
    ExampleMarkers,
    /// `1.`, `2.`, … at line start.
    Numbered,
    /// Blank-line separated paragraphs, or one reference per line.
    Lines,
}

/// Result of a segmentation pass
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    pub strategy: SegmentationStrategy,
    pub references: Vec<String>,
}

/// Locate the bibliography section in pasted text.
///
/// Uses the LAST bibliography header (`Список литературы`, `Литература`,
/// `Библиография`, `References`, `Bibliography`, `Works Cited`) and returns
/// the text after it, up to an appendix or acknowledgements header.
/// Returns `None` when there is no header or nothing follows it.
pub fn find_bibliography_section(text: &str) -> Option<String> {
    static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?im)^[ \t]*(?:Список\s+(?:использованной\s+|использованных\s+источников\s+и\s+)?литературы|Список\s+источников|Литература|Библиография|Библиографический\s+список|References|Bibliography|Works\s+Cited)[ \t]*:?[ \t]*$",
        )
        .unwrap()
    });
    static END_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?im)^[ \t]*(?:Приложени[ея](?:\s+[А-ЯA-Z0-9])?|Appendix(?:\s+[A-Z0-9])?|Acknowledge?ments|Благодарности)[ \t]*$",
        )
        .unwrap()
    });

    let header = HEADER_RE.find_iter(text).last()?;
    let rest = &text[header.end()..];
    let end = END_RE.find(rest).map_or(rest.len(), |m| m.start());

    let section = rest[..end].trim();
    if section.is_empty() {
        None
    } else {
        Some(section.to_string())
    }
}

/// Split a bibliography into individual, cleaned reference strings.
///
/// Tries, in order:
/// 1. `Пример оформления …: N` example markers
/// 2. Numbered list (`1. `, one to three digits at line start)
/// 3. Paragraph or line split
///
/// Chunks with five or fewer non-space characters are dropped.
pub fn segment_references(ref_text: &str) -> Vec<String> {
    segment_references_detailed(ref_text).references
}

/// Like [`segment_references`], also reporting which strategy was used.
pub fn segment_references_detailed(ref_text: &str) -> SegmentationResult {
    let (strategy, chunks) = if let Some(chunks) = try_example_markers(ref_text) {
        (SegmentationStrategy::ExampleMarkers, chunks)
    } else if let Some(chunks) = try_numbered(ref_text) {
        (SegmentationStrategy::Numbered, chunks)
    } else {
        (SegmentationStrategy::Lines, split_lines(ref_text))
    };

    let references: Vec<String> = chunks
        .into_iter()
        .filter(|chunk| chunk.chars().filter(|c| !c.is_whitespace()).count() > 5)
        .map(clean_multiline_reference)
        .collect();

    debug!(strategy = ?strategy, count = references.len(), "segmented references");
    SegmentationResult {
        strategy,
        references,
    }
}

fn try_example_markers(ref_text: &str) -> Option<Vec<&str>> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Пример\s+оформления.*?:\s*\d+\s*").unwrap());

    if !RE.is_match(ref_text) {
        return None;
    }
    Some(RE.split(ref_text).collect())
}

fn try_numbered(ref_text: &str) -> Option<Vec<&str>> {
    // 1-3 digits only, so a year at line start is not taken for an ordinal
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*\d{1,3}\.\s+").unwrap());

    let matches: Vec<_> = RE.find_iter(ref_text).collect();
    if matches.len() < 2 {
        return None;
    }

    let mut refs = Vec::with_capacity(matches.len() + 1);
    // Text before the first ordinal (a stray preamble line)
    refs.push(&ref_text[..matches[0].start()]);
    for (i, m) in matches.iter().enumerate() {
        let end = matches
            .get(i + 1)
            .map_or(ref_text.len(), |next| next.start());
        refs.push(&ref_text[m.end()..end]);
    }
    Some(refs)
}

fn split_lines(ref_text: &str) -> Vec<&str> {
    static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

    if BLANK_LINE.is_match(ref_text.trim()) {
        BLANK_LINE.split(ref_text).collect()
    } else {
        ref_text.lines().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_section_basic() {
        let text = "Введение.\nТекст работы.\n\nСписок литературы\n1. Первая запись 2020.\n2. Вторая запись 2021.\n";
        let section = find_bibliography_section(text).unwrap();
        assert!(section.starts_with("1. Первая"));
        assert!(!section.contains("Введение"));
    }

    #[test]
    fn test_find_section_uses_last_header() {
        let text =
            "Литература\nобзор источников в тексте\n\nReferences\nSmith, J. (2020). Title.\n";
        let section = find_bibliography_section(text).unwrap();
        assert_eq!(section, "Smith, J. (2020). Title.");
    }

    #[test]
    fn test_find_section_stops_at_appendix() {
        let text = "Bibliography\nRef one 2020.\n\nПриложение А\nТаблицы.";
        let section = find_bibliography_section(text).unwrap();
        assert_eq!(section, "Ref one 2020.");
    }

    #[test]
    fn test_find_section_header_must_be_own_line() {
        // "литература" inside a sentence is not a header
        assert!(find_bibliography_section("Вся литература указана ниже. 2020").is_none());
        assert!(find_bibliography_section("Works Cited\n   \n").is_none());
    }

    #[test]
    fn test_segment_example_markers() {
        let text = "Пример оформления книги: 1 Ким С. Ю. Право. — Казань: Книга, 2024. 280 с. Пример оформления статьи: 2 Пакшина С.М. Соли // Почвоведение. 1980.";
        let result = segment_references_detailed(text);
        assert_eq!(result.strategy, SegmentationStrategy::ExampleMarkers);
        assert_eq!(result.references.len(), 2);
        assert!(result.references[0].starts_with("Ким"));
        assert!(result.references[1].starts_with("Пакшина"));
    }

    #[test]
    fn test_segment_numbered() {
        let text = "1. Иванов И.И. Первая книга. — М.: Наука,\n2010. 300 с.\n2. Петров П.П. Вторая книга. — СПб.: Питер, 2015. 200 с.\n3. Сидоров А.А. Третья. 2001.";
        let result = segment_references_detailed(text);
        assert_eq!(result.strategy, SegmentationStrategy::Numbered);
        assert_eq!(result.references.len(), 3);
        assert_eq!(
            result.references[0],
            "Иванов И.И. Первая книга. — М.: Наука, 2010. 300 с."
        );
    }

    #[test]
    fn test_segment_numbered_ignores_years() {
        let text = "2020. Not an ordinal line\n2021. Neither is this one";
        let result = segment_references_detailed(text);
        assert_eq!(result.strategy, SegmentationStrategy::Lines);
        assert_eq!(result.references.len(), 2);
    }

    #[test]
    fn test_segment_lines_drops_short_chunks() {
        let text = "Smith, J. (2020). Title. Journal, 1(2), 3–4.\nok\n\nBrown, K. (2018). Primer. New York, NY: Penguin.";
        let refs = segment_references(text);
        assert_eq!(refs.len(), 2);
        // blank-line split keeps "ok" attached to the first paragraph
        assert!(refs[0].ends_with("3–4. ok"));
    }

    #[test]
    fn test_segment_one_per_line() {
        let text = "First reference 2020\nSecond reference 2021\nabc\n";
        let refs = segment_references(text);
        assert_eq!(refs, vec!["First reference 2020", "Second reference 2021"]);
    }
}
