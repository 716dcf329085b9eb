//! Pasted document text through segmentation and validation.

use referent_core::{Style, validate_references};
use referent_parsing::{ParsingError, extract_references_from_section, extract_references_from_text};

const DOCUMENT: &str = "\
Введение

Работа опирается на классические исследования.

Список литературы
1. Пакшина С.М. Передвижение солей в почве // Почвоведение. 1980.
   Т. 5. № 3. С. 45–50.
2. Ким С. Ю. Искусственный интеллект и право. — Казань: Университетская
   книга, 2024. 280 с.
3. Книга без издателя, 2020

Приложение А
Таблица 1.
";

#[test]
fn section_is_segmented_and_validated() {
    let refs = extract_references_from_text(DOCUMENT);
    assert_eq!(refs.len(), 3);
    assert_eq!(
        refs[0],
        "Пакшина С.М. Передвижение солей в почве // Почвоведение. 1980. Т. 5. № 3. С. 45–50."
    );

    let report = validate_references(&refs, "GOST", None).unwrap();
    let valid: Vec<usize> = report.valid.iter().map(|v| v.index).collect();
    assert_eq!(valid, vec![0, 1]);
    assert_eq!(report.invalid[0].index, 2);
}

#[test]
fn text_without_header_is_segmented_whole() {
    let refs = extract_references_from_text(
        "Smith, J. (2020). Title. Journal, 1(2), 3–4.\nBrown, K. (2018). Primer. New York, NY: Penguin.",
    );
    assert_eq!(refs.len(), 2);

    let report = referent_core::ReferenceValidator::new().validate_batch(&refs, Style::Apa, None);
    assert_eq!(report.len(), 2);
}

#[test]
fn section_required() {
    assert_eq!(
        extract_references_from_section("no header here"),
        Err(ParsingError::NoBibliographySection)
    );
    assert_eq!(extract_references_from_section(DOCUMENT).unwrap().len(), 3);
}
